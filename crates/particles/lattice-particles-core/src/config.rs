//! Particle system configuration as authored by the document layer.
//!
//! Units: positions in composition pixels (y down), velocities in px/s,
//! accelerations in px/s², angles in degrees, durations in seconds.
//! Out-of-range values are clamped by [`ParticleSystemConfig::sanitized`]
//! rather than rejected; the render loop must keep running on bad input.

use log::warn;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_PARTICLES: usize = 1_000;
pub const MAX_PARTICLES_LIMIT: usize = 100_000;
pub const DEFAULT_CHECKPOINT_INTERVAL: u32 = 10;
pub const DEFAULT_MAX_CHECKPOINTS: usize = 64;
pub const MAX_SUBSTEPS: u32 = 8;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            width: 1920.0,
            height: 1080.0,
        }
    }
}

/// What happens to a particle that leaves [`Bounds`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BoundaryBehavior {
    /// Particles fly on unbounded.
    #[default]
    None,
    /// Re-enter from the opposite edge.
    Wrap,
    /// Reflect off the edge, scaled by `bounce_damping`.
    Bounce,
    /// Removed on exit (no death sub-emission).
    Kill,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EmitterShape {
    Point,
    /// Segment centered on the emitter, rotated by `angle` degrees.
    Line { length: f32, angle: f32 },
    /// Filled disc.
    Circle { radius: f32 },
    /// Filled axis-aligned box centered on the emitter.
    Box { width: f32, height: f32 },
}

impl Default for EmitterShape {
    fn default() -> Self {
        EmitterShape::Point
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmitterConfig {
    pub id: String,
    pub enabled: bool,
    pub x: f32,
    pub y: f32,
    pub shape: EmitterShape,
    /// Launch direction in degrees (0 = +x, 90 = +y / down).
    pub direction: f32,
    /// Full cone angle in degrees around `direction`.
    pub spread: f32,
    pub speed: f32,
    /// Fractional jitter applied to speed, 0..=1.
    pub speed_variance: f32,
    /// Continuous emission in particles per second.
    pub rate: f32,
    /// Extra particles emitted once when frame `burst_frame` is simulated.
    pub burst_count: u32,
    pub burst_frame: u32,
    /// Lifetime in seconds.
    pub lifetime: f32,
    /// Fractional jitter applied to lifetime, 0..=1.
    pub lifetime_variance: f32,
    pub size: f32,
    /// Fractional jitter applied to size, 0..=1.
    pub size_variance: f32,
    /// Angular velocity range in degrees per second, centered on zero.
    pub rotation_speed: f32,
    /// First frame the emitter is active.
    pub start_frame: u32,
    /// Frame the emitter stops at (exclusive). None = forever.
    pub end_frame: Option<u32>,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            id: "emitter".into(),
            enabled: true,
            x: 960.0,
            y: 540.0,
            shape: EmitterShape::Point,
            direction: -90.0,
            spread: 30.0,
            speed: 200.0,
            speed_variance: 0.2,
            rate: 30.0,
            burst_count: 0,
            burst_frame: 0,
            lifetime: 2.0,
            lifetime_variance: 0.2,
            size: 8.0,
            size_variance: 0.25,
            rotation_speed: 0.0,
            start_frame: 0,
            end_frame: None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SubEmitterTrigger {
    #[default]
    Death,
    Birth,
}

/// Secondary emission anchored on a parent particle. Only first-generation
/// particles trigger sub-emitters, so emission never cascades.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubEmitterConfig {
    pub id: String,
    /// Emitter id whose particles trigger this sub-emitter. None = all emitters.
    pub parent_emitter: Option<String>,
    pub trigger: SubEmitterTrigger,
    pub count: u32,
    pub speed: f32,
    pub speed_variance: f32,
    /// Full cone angle in degrees around the parent's heading.
    pub spread: f32,
    /// Fraction of the parent's velocity added to each child, 0..=1.
    pub inherit_velocity: f32,
    pub lifetime: f32,
    pub size: f32,
}

impl Default for SubEmitterConfig {
    fn default() -> Self {
        Self {
            id: "sub".into(),
            parent_emitter: None,
            trigger: SubEmitterTrigger::Death,
            count: 4,
            speed: 80.0,
            speed_variance: 0.3,
            spread: 360.0,
            inherit_velocity: 0.0,
            lifetime: 0.5,
            size: 4.0,
        }
    }
}

/// Localized or global forces beyond gravity and wind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ForceField {
    /// Constant acceleration along `angle`.
    Directional { angle: f32, strength: f32 },
    /// Attraction (positive strength) or repulsion toward a point.
    /// Linear falloff to zero at `radius`; radius 0 means unbounded.
    Point {
        x: f32,
        y: f32,
        strength: f32,
        radius: f32,
    },
    /// Tangential swirl around a point, clockwise for positive strength.
    Vortex {
        x: f32,
        y: f32,
        strength: f32,
        radius: f32,
    },
    /// Velocity-proportional damping, `coefficient` per second.
    Drag { coefficient: f32 },
}

/// Noise flow field. The phase offset is drawn from the system's seeded
/// generator, so two systems with different seeds swirl differently.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TurbulenceField {
    /// Spatial frequency (1 / px).
    pub scale: f32,
    pub strength: f32,
    /// How fast the field changes, in noise units per second.
    pub evolution: f32,
}

impl Default for TurbulenceField {
    fn default() -> Self {
        Self {
            scale: 0.01,
            strength: 100.0,
            evolution: 0.5,
        }
    }
}

/// Axis-aligned obstacle standing in for a layer's bounds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RectCollider {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CollisionConfig {
    pub enabled: bool,
    /// Resolve particle-particle contacts.
    pub particle_collision: bool,
    /// Collision radius as a fraction of particle size.
    pub radius_scale: f32,
    /// Velocity retained along the contact normal, 0..=1.
    pub restitution: f32,
    /// Layer obstacles.
    pub colliders: Vec<RectCollider>,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            particle_collision: false,
            radius_scale: 0.5,
            restitution: 0.8,
            colliders: Vec::new(),
        }
    }
}

/// Full particle system description. Any change to it invalidates cached
/// simulation state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParticleSystemConfig {
    /// Signed so bad documents survive deserialization; clamped on use.
    pub max_particles: i64,
    pub gravity: f32,
    pub wind_strength: f32,
    pub wind_direction: f32,
    /// Fraction of velocity lost per second, 0..=1.
    pub friction: f32,
    /// Integration substeps per frame.
    pub substeps: u32,
    pub bounds: Bounds,
    pub boundary: BoundaryBehavior,
    /// Velocity retained on boundary bounce, 0..=1.
    pub bounce_damping: f32,
    pub emitters: Vec<EmitterConfig>,
    pub force_fields: Vec<ForceField>,
    pub turbulence_fields: Vec<TurbulenceField>,
    pub sub_emitters: Vec<SubEmitterConfig>,
    pub collision: CollisionConfig,
    /// Frames between checkpoints recorded while replaying.
    pub checkpoint_interval: u32,
    /// Checkpoints retained per controller, including frame 0.
    pub max_checkpoints: usize,
}

impl Default for ParticleSystemConfig {
    fn default() -> Self {
        Self {
            max_particles: DEFAULT_MAX_PARTICLES as i64,
            gravity: 0.0,
            wind_strength: 0.0,
            wind_direction: 0.0,
            friction: 0.0,
            substeps: 1,
            bounds: Bounds::default(),
            boundary: BoundaryBehavior::None,
            bounce_damping: 0.8,
            emitters: vec![EmitterConfig::default()],
            force_fields: Vec::new(),
            turbulence_fields: Vec::new(),
            sub_emitters: Vec::new(),
            collision: CollisionConfig::default(),
            checkpoint_interval: DEFAULT_CHECKPOINT_INTERVAL,
            max_checkpoints: DEFAULT_MAX_CHECKPOINTS,
        }
    }
}

/// Partial update merged by [`ParticleController::update_config`](crate::controller::ParticleController::update_config).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParticleConfigPatch {
    pub max_particles: Option<i64>,
    pub gravity: Option<f32>,
    pub wind_strength: Option<f32>,
    pub wind_direction: Option<f32>,
    pub friction: Option<f32>,
    pub substeps: Option<u32>,
    pub bounds: Option<Bounds>,
    pub boundary: Option<BoundaryBehavior>,
    pub bounce_damping: Option<f32>,
    pub emitters: Option<Vec<EmitterConfig>>,
    pub force_fields: Option<Vec<ForceField>>,
    pub turbulence_fields: Option<Vec<TurbulenceField>>,
    pub sub_emitters: Option<Vec<SubEmitterConfig>>,
    pub collision: Option<CollisionConfig>,
    pub checkpoint_interval: Option<u32>,
    pub max_checkpoints: Option<usize>,
}

impl ParticleConfigPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn finite_or(value: f32, fallback: f32, what: &str) -> f32 {
    if value.is_finite() {
        value
    } else {
        warn!("particle config: non-finite {what}, using {fallback}");
        fallback
    }
}

fn unit(value: f32, fallback: f32, what: &str) -> f32 {
    let v = finite_or(value, fallback, what);
    if !(0.0..=1.0).contains(&v) {
        warn!("particle config: {what} {v} outside 0..=1, clamping");
    }
    v.clamp(0.0, 1.0)
}

fn non_negative(value: f32, fallback: f32, what: &str) -> f32 {
    let v = finite_or(value, fallback, what);
    if v < 0.0 {
        warn!("particle config: negative {what} {v}, clamping to 0");
        0.0
    } else {
        v
    }
}

fn sanitize_emitter(e: &mut EmitterConfig) {
    let d = EmitterConfig::default();
    e.x = finite_or(e.x, d.x, "emitter x");
    e.y = finite_or(e.y, d.y, "emitter y");
    e.shape = match e.shape {
        EmitterShape::Point => EmitterShape::Point,
        EmitterShape::Line { length, angle } => EmitterShape::Line {
            length: non_negative(length, 0.0, "line length"),
            angle: finite_or(angle, 0.0, "line angle"),
        },
        EmitterShape::Circle { radius } => EmitterShape::Circle {
            radius: non_negative(radius, 0.0, "circle radius"),
        },
        EmitterShape::Box { width, height } => EmitterShape::Box {
            width: non_negative(width, 0.0, "box width"),
            height: non_negative(height, 0.0, "box height"),
        },
    };
    e.direction = finite_or(e.direction, d.direction, "emitter direction");
    e.spread = non_negative(e.spread, d.spread, "emitter spread").min(360.0);
    e.speed = finite_or(e.speed, d.speed, "emitter speed");
    e.speed_variance = unit(e.speed_variance, d.speed_variance, "speed variance");
    e.rate = non_negative(e.rate, d.rate, "emission rate");
    e.lifetime = non_negative(e.lifetime, d.lifetime, "lifetime");
    e.lifetime_variance = unit(e.lifetime_variance, d.lifetime_variance, "lifetime variance");
    e.size = non_negative(e.size, d.size, "size");
    e.size_variance = unit(e.size_variance, d.size_variance, "size variance");
    e.rotation_speed = finite_or(e.rotation_speed, 0.0, "rotation speed");
}

fn sanitize_sub_emitter(s: &mut SubEmitterConfig) {
    let d = SubEmitterConfig::default();
    s.speed = finite_or(s.speed, d.speed, "sub-emitter speed");
    s.speed_variance = unit(s.speed_variance, d.speed_variance, "sub-emitter speed variance");
    s.spread = non_negative(s.spread, d.spread, "sub-emitter spread").min(360.0);
    s.inherit_velocity = unit(s.inherit_velocity, 0.0, "inherit velocity");
    s.lifetime = non_negative(s.lifetime, d.lifetime, "sub-emitter lifetime");
    s.size = non_negative(s.size, d.size, "sub-emitter size");
}

fn sanitize_field(f: ForceField) -> ForceField {
    match f {
        ForceField::Directional { angle, strength } => ForceField::Directional {
            angle: finite_or(angle, 0.0, "directional angle"),
            strength: finite_or(strength, 0.0, "directional strength"),
        },
        ForceField::Point {
            x,
            y,
            strength,
            radius,
        } => ForceField::Point {
            x: finite_or(x, 0.0, "point x"),
            y: finite_or(y, 0.0, "point y"),
            strength: finite_or(strength, 0.0, "point strength"),
            radius: non_negative(radius, 0.0, "point radius"),
        },
        ForceField::Vortex {
            x,
            y,
            strength,
            radius,
        } => ForceField::Vortex {
            x: finite_or(x, 0.0, "vortex x"),
            y: finite_or(y, 0.0, "vortex y"),
            strength: finite_or(strength, 0.0, "vortex strength"),
            radius: non_negative(radius, 0.0, "vortex radius"),
        },
        ForceField::Drag { coefficient } => ForceField::Drag {
            coefficient: non_negative(coefficient, 0.0, "drag coefficient"),
        },
    }
}

impl ParticleSystemConfig {
    /// Parse a config from document JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Effective particle cap after clamping.
    #[inline]
    pub fn particle_limit(&self) -> usize {
        self.max_particles.clamp(0, MAX_PARTICLES_LIMIT as i64) as usize
    }

    /// A copy with every out-of-range parameter clamped to a safe value.
    pub fn sanitized(&self) -> Self {
        let mut c = self.clone();
        let d = ParticleSystemConfig::default();

        if c.max_particles < 0 {
            warn!(
                "particle config: negative maxParticles {}, using {}",
                c.max_particles, DEFAULT_MAX_PARTICLES
            );
            c.max_particles = DEFAULT_MAX_PARTICLES as i64;
        } else if c.max_particles > MAX_PARTICLES_LIMIT as i64 {
            warn!(
                "particle config: maxParticles {} above limit, clamping to {}",
                c.max_particles, MAX_PARTICLES_LIMIT
            );
            c.max_particles = MAX_PARTICLES_LIMIT as i64;
        }
        c.gravity = finite_or(c.gravity, d.gravity, "gravity");
        c.wind_strength = finite_or(c.wind_strength, 0.0, "wind strength");
        c.wind_direction = finite_or(c.wind_direction, 0.0, "wind direction");
        c.friction = unit(c.friction, 0.0, "friction");
        if c.substeps == 0 || c.substeps > MAX_SUBSTEPS {
            warn!(
                "particle config: substeps {} outside 1..={}, clamping",
                c.substeps, MAX_SUBSTEPS
            );
            c.substeps = c.substeps.clamp(1, MAX_SUBSTEPS);
        }
        c.bounds.width = non_negative(c.bounds.width, d.bounds.width, "bounds width");
        c.bounds.height = non_negative(c.bounds.height, d.bounds.height, "bounds height");
        c.bounce_damping = unit(c.bounce_damping, d.bounce_damping, "bounce damping");
        for e in &mut c.emitters {
            sanitize_emitter(e);
        }
        for s in &mut c.sub_emitters {
            sanitize_sub_emitter(s);
        }
        for f in &mut c.force_fields {
            *f = sanitize_field(*f);
        }
        for t in &mut c.turbulence_fields {
            t.scale = non_negative(t.scale, 0.01, "turbulence scale");
            t.strength = finite_or(t.strength, 0.0, "turbulence strength");
            t.evolution = finite_or(t.evolution, 0.0, "turbulence evolution");
        }
        c.collision.radius_scale = non_negative(c.collision.radius_scale, 0.5, "radius scale");
        c.collision.restitution = unit(c.collision.restitution, 0.8, "restitution");
        for r in &mut c.collision.colliders {
            r.x = finite_or(r.x, 0.0, "collider x");
            r.y = finite_or(r.y, 0.0, "collider y");
            r.width = non_negative(r.width, 0.0, "collider width");
            r.height = non_negative(r.height, 0.0, "collider height");
        }
        if c.checkpoint_interval == 0 {
            warn!("particle config: checkpointInterval 0, using 1");
            c.checkpoint_interval = 1;
        }
        if c.max_checkpoints < 2 {
            warn!(
                "particle config: maxCheckpoints {} below 2, using 2",
                c.max_checkpoints
            );
            c.max_checkpoints = 2;
        }
        c
    }

    /// Merge the `Some` fields of `patch` into this config.
    pub fn apply_patch(&mut self, patch: ParticleConfigPatch) {
        let ParticleConfigPatch {
            max_particles,
            gravity,
            wind_strength,
            wind_direction,
            friction,
            substeps,
            bounds,
            boundary,
            bounce_damping,
            emitters,
            force_fields,
            turbulence_fields,
            sub_emitters,
            collision,
            checkpoint_interval,
            max_checkpoints,
        } = patch;
        if let Some(v) = max_particles {
            self.max_particles = v;
        }
        if let Some(v) = gravity {
            self.gravity = v;
        }
        if let Some(v) = wind_strength {
            self.wind_strength = v;
        }
        if let Some(v) = wind_direction {
            self.wind_direction = v;
        }
        if let Some(v) = friction {
            self.friction = v;
        }
        if let Some(v) = substeps {
            self.substeps = v;
        }
        if let Some(v) = bounds {
            self.bounds = v;
        }
        if let Some(v) = boundary {
            self.boundary = v;
        }
        if let Some(v) = bounce_damping {
            self.bounce_damping = v;
        }
        if let Some(v) = emitters {
            self.emitters = v;
        }
        if let Some(v) = force_fields {
            self.force_fields = v;
        }
        if let Some(v) = turbulence_fields {
            self.turbulence_fields = v;
        }
        if let Some(v) = sub_emitters {
            self.sub_emitters = v;
        }
        if let Some(v) = collision {
            self.collision = v;
        }
        if let Some(v) = checkpoint_interval {
            self.checkpoint_interval = v;
        }
        if let Some(v) = max_checkpoints {
            self.max_checkpoints = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_particle_count_falls_back_to_default() {
        let cfg = ParticleSystemConfig {
            max_particles: -5,
            ..ParticleSystemConfig::default()
        };
        assert_eq!(cfg.sanitized().max_particles, DEFAULT_MAX_PARTICLES as i64);
        assert_eq!(cfg.particle_limit(), 0);
    }

    #[test]
    fn clamps_nan_and_ranges() {
        let mut cfg = ParticleSystemConfig {
            gravity: f32::NAN,
            friction: 3.0,
            substeps: 0,
            checkpoint_interval: 0,
            max_checkpoints: 0,
            ..ParticleSystemConfig::default()
        };
        cfg.emitters[0].rate = -10.0;
        cfg.emitters[0].spread = 720.0;
        let s = cfg.sanitized();
        assert_eq!(s.gravity, 0.0);
        assert_eq!(s.friction, 1.0);
        assert_eq!(s.substeps, 1);
        assert_eq!(s.checkpoint_interval, 1);
        assert_eq!(s.max_checkpoints, 2);
        assert_eq!(s.emitters[0].rate, 0.0);
        assert_eq!(s.emitters[0].spread, 360.0);
    }

    #[test]
    fn sanitizing_valid_config_is_identity() {
        let cfg = ParticleSystemConfig::default();
        assert_eq!(cfg.sanitized(), cfg);
    }

    #[test]
    fn patch_merges_only_present_fields() {
        let mut cfg = ParticleSystemConfig::default();
        cfg.apply_patch(ParticleConfigPatch {
            gravity: Some(980.0),
            ..ParticleConfigPatch::default()
        });
        assert_eq!(cfg.gravity, 980.0);
        assert_eq!(cfg.emitters, ParticleSystemConfig::default().emitters);
        assert!(ParticleConfigPatch::default().is_empty());
    }

    #[test]
    fn parses_document_json() {
        let cfg = ParticleSystemConfig::from_json(
            r#"{
                "maxParticles": 200,
                "gravity": 500,
                "boundary": "bounce",
                "emitters": [{ "id": "a", "shape": { "type": "circle", "radius": 20 } }],
                "forceFields": [{ "type": "vortex", "x": 0, "y": 0, "strength": 10, "radius": 100 }]
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.max_particles, 200);
        assert_eq!(cfg.boundary, BoundaryBehavior::Bounce);
        assert_eq!(cfg.emitters[0].shape, EmitterShape::Circle { radius: 20.0 });
        assert_eq!(cfg.emitters[0].rate, EmitterConfig::default().rate);
        assert_eq!(cfg.force_fields.len(), 1);
    }
}
