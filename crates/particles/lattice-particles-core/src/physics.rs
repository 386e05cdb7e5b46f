//! Fixed-timestep stepping of a particle system.
//!
//! [`SimState`] is everything that evolves over time, RNG included. Stepping
//! reads only the state, the config, and the frame index, so replaying the
//! same frames from a copy of a state yields bit-identical results.

use crate::collision;
use crate::config::{BoundaryBehavior, ParticleSystemConfig, SubEmitterTrigger};
use crate::emission::{self, is_active};
use crate::forces;
use crate::particle::Particle;
use crate::rng::SeededRng;

/// Range the turbulence phase offsets are drawn from.
const PHASE_RANGE: f32 = 256.0;

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct SimState {
    pub particles: Vec<Particle>,
    pub rng: SeededRng,
    /// Fractional emission carried between substeps, one per emitter.
    pub emission: Vec<f32>,
    pub next_id: u32,
    /// Per turbulence field noise offset.
    pub phases: Vec<f32>,
}

impl SimState {
    /// State at frame 0: no particles, phases drawn from a fresh generator.
    pub fn initial(seed: u32, cfg: &ParticleSystemConfig) -> Self {
        let mut rng = SeededRng::new(seed);
        let phases = cfg
            .turbulence_fields
            .iter()
            .map(|_| rng.range(0.0, PHASE_RANGE))
            .collect();
        Self {
            particles: Vec::new(),
            rng,
            emission: vec![0.0; cfg.emitters.len()],
            next_id: 0,
            phases,
        }
    }

    fn take_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }
}

/// Advance `state` from `frame` to `frame + 1`.
pub(crate) fn step_frame(state: &mut SimState, cfg: &ParticleSystemConfig, fps: f32, frame: u32) {
    let substeps = cfg.substeps.max(1);
    let frame_dt = 1.0 / fps as f64;
    let dt = (frame_dt / substeps as f64) as f32;
    for sub in 0..substeps {
        let time = (frame as f64 * frame_dt + sub as f64 * dt as f64) as f32;
        substep(state, cfg, frame, sub, dt, time);
    }
}

fn substep(state: &mut SimState, cfg: &ParticleSystemConfig, frame: u32, sub: u32, dt: f32, time: f32) {
    emit(state, cfg, frame, sub, dt);

    let damping = forces::damping(cfg, dt);
    let SimState {
        particles, phases, ..
    } = state;
    for p in particles.iter_mut() {
        let (ax, ay) = forces::acceleration(cfg, phases, time, p);
        p.vx = (p.vx + ax * dt) * damping;
        p.vy = (p.vy + ay * dt) * damping;
        p.x += p.vx * dt;
        p.y += p.vy * dt;
        p.rotation = (p.rotation + p.angular_velocity * dt).rem_euclid(360.0);
        p.age += dt;
        p.opacity = 1.0 - p.life_fraction();
    }

    if cfg.collision.enabled {
        collision::resolve_colliders(particles, &cfg.collision);
        if cfg.collision.particle_collision {
            collision::resolve_particles(particles, &cfg.collision);
        }
    }

    apply_boundary(particles, cfg);
    retire(state, cfg);
}

fn emit(state: &mut SimState, cfg: &ParticleSystemConfig, frame: u32, sub: u32, dt: f32) {
    let limit = cfg.particle_limit();
    for (index, emitter) in cfg.emitters.iter().enumerate() {
        let Some(acc) = state.emission.get_mut(index) else {
            continue;
        };
        if !is_active(emitter, frame) {
            continue;
        }
        *acc += emitter.rate * dt;
        let mut count = acc.floor() as u32;
        *acc -= count as f32;
        if sub == 0 && frame == emitter.burst_frame {
            count = count.saturating_add(emitter.burst_count);
        }

        for _ in 0..count {
            if state.particles.len() >= limit {
                break;
            }
            let id = state.take_id();
            let p = emission::spawn(index as u32, emitter, &mut state.rng, id);
            state.particles.push(p);
            spawn_children(state, cfg, &p, SubEmitterTrigger::Birth);
        }
    }
}

fn spawn_children(
    state: &mut SimState,
    cfg: &ParticleSystemConfig,
    parent: &Particle,
    trigger: SubEmitterTrigger,
) {
    if parent.generation > 0 || cfg.sub_emitters.is_empty() {
        return;
    }
    let limit = cfg.particle_limit();
    let parent_id = cfg
        .emitters
        .get(parent.emitter as usize)
        .map(|e| e.id.as_str());
    let base = cfg.emitters.len() as u32;

    for (i, sub) in cfg.sub_emitters.iter().enumerate() {
        if sub.trigger != trigger {
            continue;
        }
        if let Some(wanted) = sub.parent_emitter.as_deref() {
            if parent_id != Some(wanted) {
                continue;
            }
        }
        for _ in 0..sub.count {
            if state.particles.len() >= limit {
                return;
            }
            let id = state.take_id();
            let child = emission::spawn_child(parent, base + i as u32, sub, &mut state.rng, id);
            state.particles.push(child);
        }
    }
}

fn apply_boundary(particles: &mut Vec<Particle>, cfg: &ParticleSystemConfig) {
    let (w, h) = (cfg.bounds.width, cfg.bounds.height);
    match cfg.boundary {
        BoundaryBehavior::None => {}
        BoundaryBehavior::Wrap => {
            for p in particles.iter_mut() {
                if w > 0.0 {
                    p.x = p.x.rem_euclid(w);
                }
                if h > 0.0 {
                    p.y = p.y.rem_euclid(h);
                }
            }
        }
        BoundaryBehavior::Bounce => {
            let k = cfg.bounce_damping;
            for p in particles.iter_mut() {
                (p.x, p.vx) = reflect(p.x, p.vx, w, k);
                (p.y, p.vy) = reflect(p.y, p.vy, h, k);
            }
        }
        BoundaryBehavior::Kill => {
            particles.retain(|p| p.x >= 0.0 && p.x <= w && p.y >= 0.0 && p.y <= h);
        }
    }
}

fn reflect(pos: f32, vel: f32, extent: f32, damping: f32) -> (f32, f32) {
    if pos < 0.0 {
        ((-pos).min(extent), vel.abs() * damping)
    } else if pos > extent {
        ((2.0 * extent - pos).max(0.0), -vel.abs() * damping)
    } else {
        (pos, vel)
    }
}

/// Remove expired particles, then fire death sub-emitters in spawn order.
fn retire(state: &mut SimState, cfg: &ParticleSystemConfig) {
    let has_death = cfg
        .sub_emitters
        .iter()
        .any(|s| s.trigger == SubEmitterTrigger::Death);
    let dying: Vec<Particle> = if has_death {
        state
            .particles
            .iter()
            .filter(|p| p.is_dead() && p.generation == 0)
            .copied()
            .collect()
    } else {
        Vec::new()
    };
    state.particles.retain(|p| !p.is_dead());
    for parent in &dying {
        spawn_children(state, cfg, parent, SubEmitterTrigger::Death);
    }
}
