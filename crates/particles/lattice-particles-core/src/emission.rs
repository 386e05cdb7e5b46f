//! Spawning new particles from emitters and sub-emitters.
//!
//! Every function draws from the caller's [`SeededRng`] in a fixed order, so
//! the draw sequence depends only on the state being replayed.

use std::f32::consts::TAU;

use crate::config::{EmitterConfig, EmitterShape, SubEmitterConfig};
use crate::forces::unit_vector;
use crate::particle::Particle;
use crate::rng::SeededRng;

/// Spawn offset relative to the emitter origin.
fn shape_offset(shape: &EmitterShape, rng: &mut SeededRng) -> (f32, f32) {
    match *shape {
        EmitterShape::Point => (0.0, 0.0),
        EmitterShape::Line { length, angle } => {
            let t = rng.signed() * length * 0.5;
            let (dx, dy) = unit_vector(angle);
            (dx * t, dy * t)
        }
        EmitterShape::Circle { radius } => {
            // sqrt keeps the disc uniformly filled
            let r = radius * rng.next_f32().sqrt();
            let theta = rng.next_f32() * TAU;
            (r * theta.cos(), r * theta.sin())
        }
        EmitterShape::Box { width, height } => {
            (rng.signed() * width * 0.5, rng.signed() * height * 0.5)
        }
    }
}

/// Whether emitter `e` emits during the step starting at `frame`.
pub(crate) fn is_active(e: &EmitterConfig, frame: u32) -> bool {
    e.enabled && frame >= e.start_frame && e.end_frame.map_or(true, |end| frame < end)
}

pub(crate) fn spawn(index: u32, e: &EmitterConfig, rng: &mut SeededRng, id: u32) -> Particle {
    let (ox, oy) = shape_offset(&e.shape, rng);
    let angle = e.direction + rng.signed() * e.spread * 0.5;
    let speed = rng.vary(e.speed, e.speed_variance);
    let (dx, dy) = unit_vector(angle);
    let lifetime = rng.vary(e.lifetime, e.lifetime_variance).max(0.0);
    let size = rng.vary(e.size, e.size_variance).max(0.0);
    let rotation = rng.range(0.0, 360.0);
    let angular_velocity = rng.signed() * e.rotation_speed;

    Particle {
        id,
        emitter: index,
        x: e.x + ox,
        y: e.y + oy,
        vx: dx * speed,
        vy: dy * speed,
        age: 0.0,
        lifetime,
        size,
        rotation,
        angular_velocity,
        opacity: 1.0,
        generation: 0,
    }
}

/// Spawn one child of `parent`. Children fan out around the parent's heading
/// (or +x for a parent at rest).
pub(crate) fn spawn_child(
    parent: &Particle,
    index: u32,
    sub: &SubEmitterConfig,
    rng: &mut SeededRng,
    id: u32,
) -> Particle {
    let heading = if parent.vx == 0.0 && parent.vy == 0.0 {
        0.0
    } else {
        parent.vy.atan2(parent.vx).to_degrees()
    };
    let angle = heading + rng.signed() * sub.spread * 0.5;
    let speed = rng.vary(sub.speed, sub.speed_variance);
    let (dx, dy) = unit_vector(angle);

    Particle {
        id,
        emitter: index,
        x: parent.x,
        y: parent.y,
        vx: dx * speed + parent.vx * sub.inherit_velocity,
        vy: dy * speed + parent.vy * sub.inherit_velocity,
        age: 0.0,
        lifetime: sub.lifetime,
        size: sub.size,
        rotation: parent.rotation,
        angular_velocity: parent.angular_velocity,
        opacity: 1.0,
        generation: parent.generation.saturating_add(1),
    }
}
