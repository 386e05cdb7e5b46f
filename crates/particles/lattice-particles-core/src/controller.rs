//! Checkpointed, scrub-order independent simulation of one particle system.

use log::{debug, trace};

use crate::checkpoint::{Checkpoint, CheckpointStore};
use crate::config::{ParticleConfigPatch, ParticleSystemConfig};
use crate::error::{frame_index, SimError};
use crate::particle::ParticleSnapshot;
use crate::physics::{step_frame, SimState};

pub const DEFAULT_FPS: f32 = 30.0;
pub const MAX_FPS: f32 = 240.0;
/// Requests beyond this frame are clamped to it.
pub const MAX_FRAME: u32 = 1_000_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControllerState {
    /// No checkpoints; the next evaluation rebuilds frame 0 from the seed.
    Fresh,
    Checkpointed,
}

pub(crate) fn sanitize_fps(fps: f32) -> f32 {
    if fps.is_finite() && fps > 0.0 {
        fps.min(MAX_FPS)
    } else {
        log::warn!("invalid particle fps {fps}, using {DEFAULT_FPS}");
        DEFAULT_FPS
    }
}

/// Owns one particle system's config, seed, and checkpoints.
///
/// `evaluate_at_frame(n)` always equals stepping the frame-0 state `n`
/// times, whatever was requested before.
#[derive(Debug)]
pub struct ParticleController {
    seed: u32,
    fps: f32,
    /// Config as supplied, before clamping.
    authored: ParticleSystemConfig,
    config: ParticleSystemConfig,
    checkpoints: CheckpointStore,
}

impl ParticleController {
    pub fn new(seed: u32, config: ParticleSystemConfig, fps: f32) -> Self {
        Self {
            seed,
            fps: sanitize_fps(fps),
            config: config.sanitized(),
            authored: config,
            checkpoints: CheckpointStore::default(),
        }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Effective (sanitized) configuration.
    pub fn config(&self) -> &ParticleSystemConfig {
        &self.config
    }

    /// Configuration as last supplied, before clamping.
    pub fn authored_config(&self) -> &ParticleSystemConfig {
        &self.authored
    }

    pub fn state(&self) -> ControllerState {
        if self.checkpoints.is_empty() {
            ControllerState::Fresh
        } else {
            ControllerState::Checkpointed
        }
    }

    pub fn checkpoint_count(&self) -> usize {
        self.checkpoints.len()
    }

    /// Frames currently held as checkpoints, ascending.
    pub fn checkpoint_frames(&self) -> Vec<u32> {
        self.checkpoints.frames().collect()
    }

    pub fn evaluate_at_frame(&mut self, frame: f64) -> Result<ParticleSnapshot, SimError> {
        let target = frame_index(frame, MAX_FRAME)?;

        if self.checkpoints.is_empty() {
            let origin = SimState::initial(self.seed, &self.config);
            self.checkpoints.insert(0, Checkpoint::new(origin));
        }
        if let Some(hit) = self.checkpoints.get(target) {
            return Ok(ParticleSnapshot::new(target, self.seed, hit.frozen.clone()));
        }

        let (start, mut state) = match self.checkpoints.nearest_at_or_before(target) {
            Some((f, cp)) => (f, cp.state.clone()),
            None => (0, SimState::initial(self.seed, &self.config)),
        };
        debug!(
            "particle replay seed={} frames {}..{} ({} steps)",
            self.seed,
            start,
            target,
            target - start
        );

        // Record intermediates only within `window` frames of the target.
        let interval = self.config.checkpoint_interval.max(1);
        let capacity = self.config.max_checkpoints;
        let window = interval as u64 * capacity.saturating_sub(2) as u64;
        for f in start..target {
            step_frame(&mut state, &self.config, self.fps, f);
            let reached = f + 1;
            if reached < target
                && reached % interval == 0
                && u64::from(target - reached) <= window
                && self.checkpoints.get(reached).is_none()
            {
                self.checkpoints
                    .insert(reached, Checkpoint::new(state.clone()));
                self.checkpoints.evict(capacity, target);
            }
        }

        let checkpoint = Checkpoint::new(state);
        let frozen = checkpoint.frozen.clone();
        self.checkpoints.insert(target, checkpoint);
        self.checkpoints.evict(capacity, target);
        trace!(
            "particle checkpoints kept={} peak={}",
            self.checkpoints.len(),
            self.checkpoints.high_water()
        );
        Ok(ParticleSnapshot::new(target, self.seed, frozen))
    }

    /// Drop every checkpoint. The next evaluation restarts from the seed.
    pub fn reset(&mut self) {
        debug!("particle controller reset seed={}", self.seed);
        self.checkpoints.clear();
    }

    /// Merge `patch` into the config and invalidate cached state.
    pub fn update_config(&mut self, patch: ParticleConfigPatch) {
        if patch.is_empty() {
            return;
        }
        let mut next = self.authored.clone();
        next.apply_patch(patch);
        self.config = next.sanitized();
        self.authored = next;
        self.invalidate();
    }

    /// Replace the whole config. Configs equal to the current one, as
    /// authored or after clamping, keep the checkpoints.
    pub fn set_config(&mut self, config: ParticleSystemConfig) {
        if config == self.authored {
            return;
        }
        let next = config.sanitized();
        self.authored = config;
        if next != self.config {
            self.config = next;
            self.invalidate();
        }
    }

    fn invalidate(&mut self) {
        debug!(
            "particle config changed seed={}, dropping {} checkpoints",
            self.seed,
            self.checkpoints.len()
        );
        self.checkpoints.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_until_first_evaluation() {
        let mut c = ParticleController::new(1, ParticleSystemConfig::default(), 30.0);
        assert_eq!(c.state(), ControllerState::Fresh);
        c.evaluate_at_frame(0.0).unwrap();
        assert_eq!(c.state(), ControllerState::Checkpointed);
        c.reset();
        assert_eq!(c.state(), ControllerState::Fresh);
    }

    #[test]
    fn long_replay_never_outgrows_capacity() {
        let cfg = ParticleSystemConfig {
            checkpoint_interval: 5,
            max_checkpoints: 8,
            ..ParticleSystemConfig::default()
        };
        let mut c = ParticleController::new(1, cfg, 30.0);
        c.evaluate_at_frame(20_000.0).unwrap();
        assert!(c.checkpoints.high_water() <= 9, "{}", c.checkpoints.high_water());
        assert_eq!(
            c.checkpoint_frames(),
            vec![0, 19_970, 19_975, 19_980, 19_985, 19_990, 19_995, 20_000]
        );
    }

    #[test]
    fn replay_records_interval_checkpoints() {
        let mut c = ParticleController::new(1, ParticleSystemConfig::default(), 30.0);
        c.evaluate_at_frame(25.0).unwrap();
        assert_eq!(c.checkpoint_frames(), vec![0, 10, 20, 25]);
    }

    #[test]
    fn invalid_fps_falls_back() {
        let c = ParticleController::new(1, ParticleSystemConfig::default(), f32::NAN);
        assert_eq!(c.fps(), DEFAULT_FPS);
        let c = ParticleController::new(1, ParticleSystemConfig::default(), -12.0);
        assert_eq!(c.fps(), DEFAULT_FPS);
    }

    #[test]
    fn non_finite_request_leaves_state_untouched() {
        let mut c = ParticleController::new(1, ParticleSystemConfig::default(), 30.0);
        assert_eq!(
            c.evaluate_at_frame(f64::INFINITY),
            Err(SimError::NonFiniteFrame {
                frame: f64::INFINITY
            })
        );
        assert_eq!(c.state(), ControllerState::Fresh);
    }

    #[test]
    fn equal_config_keeps_checkpoints() {
        let mut c = ParticleController::new(1, ParticleSystemConfig::default(), 30.0);
        c.evaluate_at_frame(12.0).unwrap();
        let before = c.checkpoint_count();
        c.set_config(ParticleSystemConfig::default());
        assert_eq!(c.checkpoint_count(), before);
        c.update_config(ParticleConfigPatch::default());
        assert_eq!(c.checkpoint_count(), before);
    }

    #[test]
    fn exact_hit_shares_frozen_buffer() {
        let mut c = ParticleController::new(1, ParticleSystemConfig::default(), 30.0);
        let a = c.evaluate_at_frame(8.0).unwrap();
        let b = c.evaluate_at_frame(8.4).unwrap();
        assert!(a.shares_buffer(&b));
        assert_eq!(b.frame(), 8);
    }
}
