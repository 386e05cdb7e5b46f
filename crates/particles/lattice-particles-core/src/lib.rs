//! Lattice Particles Core
//!
//! Deterministic particle simulation for compositor layers. A
//! [`ParticleController`] answers "what do the particles look like at frame
//! F" by replaying fixed timesteps from the nearest checkpoint, so the answer
//! never depends on which frames were requested before. The
//! [`ParticleRegistry`] owns one controller per layer and derives each seed
//! from the layer id.

mod checkpoint;
mod collision;
mod emission;
mod forces;
mod physics;

pub mod config;
pub mod controller;
pub mod error;
pub mod particle;
pub mod registry;
pub mod rng;

pub use config::{
    BoundaryBehavior, Bounds, CollisionConfig, EmitterConfig, EmitterShape, ForceField,
    ParticleConfigPatch, ParticleSystemConfig, RectCollider, SubEmitterConfig, SubEmitterTrigger,
    TurbulenceField,
};
pub use controller::{ControllerState, ParticleController};
pub use error::SimError;
pub use particle::{Particle, ParticleSnapshot};
pub use registry::{seed_for_layer, ParticleRegistry};
pub use rng::SeededRng;
