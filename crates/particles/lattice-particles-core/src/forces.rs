//! Per-substep forces. Everything here is a pure function of the particle,
//! the config, the turbulence phases, and the simulation time.

use crate::config::{ForceField, ParticleSystemConfig, TurbulenceField};
use crate::particle::Particle;

const MIN_FIELD_DISTANCE: f32 = 1.0;

#[inline]
pub(crate) fn unit_vector(degrees: f32) -> (f32, f32) {
    let r = degrees.to_radians();
    (r.cos(), r.sin())
}

/// Falloff weight for a field with `radius` (0 = unbounded).
#[inline]
fn falloff(dist: f32, radius: f32) -> f32 {
    if radius <= 0.0 {
        1.0
    } else if dist >= radius {
        0.0
    } else {
        1.0 - dist / radius
    }
}

/// Acceleration contributed by gravity, wind, and the positional force fields.
pub(crate) fn acceleration(
    cfg: &ParticleSystemConfig,
    phases: &[f32],
    time: f32,
    p: &Particle,
) -> (f32, f32) {
    let mut ax = 0.0;
    let mut ay = cfg.gravity;

    if cfg.wind_strength != 0.0 {
        let (wx, wy) = unit_vector(cfg.wind_direction);
        ax += wx * cfg.wind_strength;
        ay += wy * cfg.wind_strength;
    }

    for field in &cfg.force_fields {
        match *field {
            ForceField::Directional { angle, strength } => {
                let (dx, dy) = unit_vector(angle);
                ax += dx * strength;
                ay += dy * strength;
            }
            ForceField::Point {
                x,
                y,
                strength,
                radius,
            } => {
                let (dx, dy) = (x - p.x, y - p.y);
                let dist = (dx * dx + dy * dy).sqrt();
                if dist > f32::EPSILON {
                    let w = strength * falloff(dist, radius) / dist.max(MIN_FIELD_DISTANCE);
                    ax += dx * w;
                    ay += dy * w;
                }
            }
            ForceField::Vortex {
                x,
                y,
                strength,
                radius,
            } => {
                let (dx, dy) = (p.x - x, p.y - y);
                let dist = (dx * dx + dy * dy).sqrt();
                if dist > f32::EPSILON {
                    // Tangent (-dy, dx) is clockwise on screen with y down.
                    let w = strength * falloff(dist, radius) / dist.max(MIN_FIELD_DISTANCE);
                    ax += -dy * w;
                    ay += dx * w;
                }
            }
            ForceField::Drag { .. } => {}
        }
    }

    for (field, phase) in cfg.turbulence_fields.iter().zip(phases) {
        let (tx, ty) = turbulence(field, *phase, p.x, p.y, time);
        ax += tx;
        ay += ty;
    }

    (ax, ay)
}

/// Combined velocity multiplier for drag fields and friction over `dt`.
pub(crate) fn damping(cfg: &ParticleSystemConfig, dt: f32) -> f32 {
    let mut k = 1.0;
    if cfg.friction > 0.0 {
        k *= (1.0 - cfg.friction).powf(dt);
    }
    for field in &cfg.force_fields {
        if let ForceField::Drag { coefficient } = *field {
            k *= (-coefficient * dt).exp();
        }
    }
    k
}

fn lattice_hash(ix: i32, iy: i32, iz: i32) -> f32 {
    let mut h = (ix as u32)
        .wrapping_mul(0x8DA6_B343)
        .wrapping_add((iy as u32).wrapping_mul(0xD816_3841))
        .wrapping_add((iz as u32).wrapping_mul(0xCB1A_B31F));
    h ^= h >> 13;
    h = h.wrapping_mul(0x5BD1_E995);
    h ^= h >> 15;
    (h >> 8) as f32 / (1u32 << 24) as f32 * 2.0 - 1.0
}

#[inline]
fn smooth(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

/// Trilinear value noise in `[-1, 1]`.
pub(crate) fn value_noise(x: f32, y: f32, z: f32) -> f32 {
    let (fx, fy, fz) = (x.floor(), y.floor(), z.floor());
    let (ix, iy, iz) = (fx as i32, fy as i32, fz as i32);
    let (u, v, w) = (smooth(x - fx), smooth(y - fy), smooth(z - fz));

    let lerp = |a: f32, b: f32, t: f32| a + (b - a) * t;
    let plane = |iz: i32| {
        let a = lerp(lattice_hash(ix, iy, iz), lattice_hash(ix + 1, iy, iz), u);
        let b = lerp(
            lattice_hash(ix, iy + 1, iz),
            lattice_hash(ix + 1, iy + 1, iz),
            u,
        );
        lerp(a, b, v)
    };
    lerp(plane(iz), plane(iz + 1), w)
}

fn turbulence(field: &TurbulenceField, phase: f32, x: f32, y: f32, time: f32) -> (f32, f32) {
    if field.strength == 0.0 {
        return (0.0, 0.0);
    }
    let nx = x * field.scale + phase;
    let ny = y * field.scale + phase;
    let nz = time * field.evolution;
    // Offset the second channel so the two axes are decorrelated.
    let fx = value_noise(nx, ny, nz);
    let fy = value_noise(nx + 31.416, ny + 47.853, nz);
    (fx * field.strength, fy * field.strength)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(x: f32, y: f32) -> Particle {
        Particle {
            id: 0,
            emitter: 0,
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            age: 0.0,
            lifetime: 1.0,
            size: 1.0,
            rotation: 0.0,
            angular_velocity: 0.0,
            opacity: 1.0,
            generation: 0,
        }
    }

    fn bare() -> ParticleSystemConfig {
        ParticleSystemConfig {
            emitters: Vec::new(),
            ..ParticleSystemConfig::default()
        }
    }

    #[test]
    fn gravity_and_wind_add_up() {
        let cfg = ParticleSystemConfig {
            gravity: 100.0,
            wind_strength: 10.0,
            wind_direction: 0.0,
            ..bare()
        };
        let (ax, ay) = acceleration(&cfg, &[], 0.0, &at(0.0, 0.0));
        assert!((ax - 10.0).abs() < 1e-4);
        assert!((ay - 100.0).abs() < 1e-4);
    }

    #[test]
    fn point_field_attracts_within_radius_only() {
        let cfg = ParticleSystemConfig {
            force_fields: vec![ForceField::Point {
                x: 100.0,
                y: 0.0,
                strength: 50.0,
                radius: 200.0,
            }],
            ..bare()
        };
        let (ax, _) = acceleration(&cfg, &[], 0.0, &at(0.0, 0.0));
        assert!(ax > 0.0);
        let (ax, ay) = acceleration(&cfg, &[], 0.0, &at(400.0, 0.0));
        assert_eq!((ax, ay), (0.0, 0.0));
    }

    #[test]
    fn vortex_is_tangential() {
        let cfg = ParticleSystemConfig {
            force_fields: vec![ForceField::Vortex {
                x: 0.0,
                y: 0.0,
                strength: 10.0,
                radius: 0.0,
            }],
            ..bare()
        };
        let (ax, ay) = acceleration(&cfg, &[], 0.0, &at(50.0, 0.0));
        assert!(ax.abs() < 1e-5);
        assert!(ay > 0.0);
    }

    #[test]
    fn damping_combines_friction_and_drag() {
        let cfg = ParticleSystemConfig {
            friction: 0.5,
            force_fields: vec![ForceField::Drag { coefficient: 1.0 }],
            ..bare()
        };
        let k = damping(&cfg, 1.0);
        assert!((k - 0.5 * (-1.0f32).exp()).abs() < 1e-5);
        assert_eq!(damping(&bare(), 1.0 / 30.0), 1.0);
    }

    #[test]
    fn noise_is_bounded_and_repeatable() {
        for i in 0..200 {
            let x = i as f32 * 0.37;
            let v = value_noise(x, x * 0.5, 1.3);
            assert!((-1.0..=1.0).contains(&v));
            assert_eq!(v, value_noise(x, x * 0.5, 1.3));
        }
    }
}
