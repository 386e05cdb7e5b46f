//! Layer id → particle controller map.

use hashbrown::HashMap;
use log::debug;

use crate::config::ParticleSystemConfig;
use crate::controller::{sanitize_fps, ParticleController};
use crate::error::SimError;
use crate::particle::ParticleSnapshot;

const FNV_OFFSET: u32 = 0x811C_9DC5;
const FNV_PRIME: u32 = 0x0100_0193;
/// Substituted when a layer id hashes to zero.
const ZERO_SEED_FALLBACK: u32 = 0x9E37_79B9;

/// Seed for a layer: 32-bit FNV-1a over the UTF-8 bytes of the id.
///
/// Pure function of the id, so independent registries agree.
pub fn seed_for_layer(layer_id: &str) -> u32 {
    let hash = layer_id
        .bytes()
        .fold(FNV_OFFSET, |h, b| (h ^ b as u32).wrapping_mul(FNV_PRIME));
    if hash == 0 {
        ZERO_SEED_FALLBACK
    } else {
        hash
    }
}

#[derive(Debug)]
pub struct ParticleRegistry {
    fps: f32,
    controllers: HashMap<String, ParticleController>,
}

impl ParticleRegistry {
    pub fn new(fps: f32) -> Self {
        Self {
            fps: sanitize_fps(fps),
            controllers: HashMap::new(),
        }
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Controller for `layer_id`, created on first use. An existing
    /// controller whose config differs from `config` is reconfigured.
    pub fn get_controller(
        &mut self,
        layer_id: &str,
        config: &ParticleSystemConfig,
    ) -> &mut ParticleController {
        let fps = self.fps;
        let controller = self
            .controllers
            .entry_ref(layer_id)
            .or_insert_with(|| {
                let seed = seed_for_layer(layer_id);
                debug!("new particle controller for layer '{layer_id}' seed={seed}");
                ParticleController::new(seed, config.clone(), fps)
            });
        if controller.authored_config() != config {
            controller.set_config(config.clone());
        }
        controller
    }

    pub fn evaluate_layer(
        &mut self,
        layer_id: &str,
        frame: f64,
        config: &ParticleSystemConfig,
    ) -> Result<ParticleSnapshot, SimError> {
        self.get_controller(layer_id, config).evaluate_at_frame(frame)
    }

    pub fn controller(&self, layer_id: &str) -> Option<&ParticleController> {
        self.controllers.get(layer_id)
    }

    pub fn contains(&self, layer_id: &str) -> bool {
        self.controllers.contains_key(layer_id)
    }

    /// Drop one layer's controller. Returns whether it existed.
    pub fn remove(&mut self, layer_id: &str) -> bool {
        self.controllers.remove(layer_id).is_some()
    }

    /// Dispose every controller.
    pub fn clear(&mut self) {
        debug!("clearing {} particle controllers", self.controllers.len());
        self.controllers.clear();
    }

    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }
}

impl Default for ParticleRegistry {
    fn default() -> Self {
        Self::new(crate::controller::DEFAULT_FPS)
    }
}
