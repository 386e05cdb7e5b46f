//! Particle records and the frozen snapshots handed to renderers.

use std::sync::Arc;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// One live particle. Plain data, copied wholesale into checkpoints.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Particle {
    /// Unique within one simulation run, assigned in spawn order.
    pub id: u32,
    /// Index of the emitter (or `emitters.len() + i` for sub-emitter `i`).
    pub emitter: u32,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Seconds since spawn.
    pub age: f32,
    /// Seconds until death.
    pub lifetime: f32,
    pub size: f32,
    /// Degrees.
    pub rotation: f32,
    /// Degrees per second.
    pub angular_velocity: f32,
    pub opacity: f32,
    /// 0 for emitter particles, 1 for sub-emitter children.
    pub generation: u8,
}

impl Particle {
    /// Normalized age in `[0, 1]`.
    #[inline]
    pub fn life_fraction(&self) -> f32 {
        if self.lifetime <= 0.0 {
            1.0
        } else {
            (self.age / self.lifetime).clamp(0.0, 1.0)
        }
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.age >= self.lifetime
    }
}

/// Particle state at one frame. Cloning shares the particle buffer; nothing
/// reachable from a snapshot can write back into the simulation.
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleSnapshot {
    frame: u32,
    seed: u32,
    particles: Arc<[Particle]>,
}

impl ParticleSnapshot {
    pub(crate) fn new(frame: u32, seed: u32, particles: Arc<[Particle]>) -> Self {
        Self {
            frame,
            seed,
            particles,
        }
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn count(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Particles in spawn order.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Particle> {
        self.particles.iter()
    }

    /// True when both snapshots point at the same frozen buffer.
    pub fn shares_buffer(&self, other: &ParticleSnapshot) -> bool {
        Arc::ptr_eq(&self.particles, &other.particles)
    }
}

impl<'a> IntoIterator for &'a ParticleSnapshot {
    type Item = &'a Particle;
    type IntoIter = std::slice::Iter<'a, Particle>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Serialize for ParticleSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("ParticleSnapshot", 4)?;
        s.serialize_field("frame", &self.frame)?;
        s.serialize_field("seed", &self.seed)?;
        s.serialize_field("count", &self.particles.len())?;
        s.serialize_field("particles", &*self.particles)?;
        s.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn particle(id: u32) -> Particle {
        Particle {
            id,
            emitter: 0,
            x: 1.0,
            y: 2.0,
            vx: 0.0,
            vy: 0.0,
            age: 0.5,
            lifetime: 2.0,
            size: 4.0,
            rotation: 0.0,
            angular_velocity: 0.0,
            opacity: 1.0,
            generation: 0,
        }
    }

    #[test]
    fn snapshot_serializes_count_and_records() {
        let snap = ParticleSnapshot::new(3, 9, vec![particle(0), particle(1)].into());
        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["frame"], 3);
        assert_eq!(json["count"], 2);
        assert_eq!(json["particles"][1]["id"], 1);
        assert_eq!(json["particles"][0]["angularVelocity"], 0.0);
    }

    #[test]
    fn clones_share_the_frozen_buffer() {
        let snap = ParticleSnapshot::new(0, 1, vec![particle(0)].into());
        let copy = snap.clone();
        assert!(snap.shares_buffer(&copy));
        assert_eq!(snap.particles()[0].life_fraction(), 0.25);
    }
}
