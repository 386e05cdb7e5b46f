//! Lattice Animation Core (engine-agnostic)
//!
//! Answers "what is this property's value at frame F". Keyframes may arrive
//! unsorted; frames may be negative, fractional or far outside the keyed
//! range. Evaluation is a pure function of (property, frame); the
//! [`KeyframeEvaluator`] only adds memoization on top of it.

pub mod baking;
pub mod config;
pub mod data;
pub mod derivative;
pub mod error;
pub mod evaluator;
pub mod ids;
pub mod interp;
pub mod sampling;

// Re-exports for consumers (render pipeline, editors)
pub use baking::{bake_property, export_baked_json, BakeConfig, BakedProperty};
pub use config::EvaluatorConfig;
pub use data::{AnimatableProperty, BezierHandle, Interpolation, Keyframe};
pub use derivative::evaluate_velocity;
pub use error::EvalError;
pub use evaluator::{CacheStats, KeyframeEvaluator};
pub use ids::PropertyId;
pub use interp::easing::EasingId;
pub use interp::functions::interpolate;
pub use sampling::evaluate_property;
pub use lattice_api_core::{Value, ValueKind};
