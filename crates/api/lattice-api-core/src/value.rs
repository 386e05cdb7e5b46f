//! Value: the closed set of animatable value kinds.
//! Numeric payloads are f32 throughout.

use serde::{Deserialize, Serialize};

/// Lightweight kind enum for dispatch and diagnostics.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Number,
    Vec2,
    Vec3,
    Color,
    Array,
    Bool,
    Text,
}

impl ValueKind {
    /// Kinds the interpolator blends. Everything else steps.
    #[inline]
    pub fn is_interpolable(self) -> bool {
        !matches!(self, ValueKind::Bool | ValueKind::Text)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum Value {
    /// Scalar number
    Number(f32),

    /// 2D vector
    Vec2 { x: f32, y: f32 },

    /// 3D vector
    Vec3 { x: f32, y: f32, z: f32 },

    /// Hex color string (`#rrggbb`, `#rgb` or `#rrggbbaa`)
    Color(String),

    /// Fixed-length numeric array, blended elementwise
    Array(Vec<f32>),

    /// Boolean (step)
    Bool(bool),

    /// Text / string; step-only
    Text(String),
}

impl Value {
    /// Return the coarse kind of this value.
    #[inline]
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Number(_) => ValueKind::Number,
            Value::Vec2 { .. } => ValueKind::Vec2,
            Value::Vec3 { .. } => ValueKind::Vec3,
            Value::Color(_) => ValueKind::Color,
            Value::Array(_) => ValueKind::Array,
            Value::Bool(_) => ValueKind::Bool,
            Value::Text(_) => ValueKind::Text,
        }
    }

    /// Convenience constructors
    pub fn number(v: f32) -> Self {
        Value::Number(v)
    }

    pub fn vec2(x: f32, y: f32) -> Self {
        Value::Vec2 { x, y }
    }

    pub fn vec3(x: f32, y: f32, z: f32) -> Self {
        Value::Vec3 { x, y, z }
    }

    pub fn color(hex: impl Into<String>) -> Self {
        Value::Color(hex.into())
    }

    pub fn as_number(&self) -> Option<f32> {
        match self {
            Value::Number(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Number(v)
    }
}

/// Document JSON numbers arrive as f64; narrowed to the f32 payload.
impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(v as f32)
    }
}

impl From<[f32; 2]> for Value {
    fn from(v: [f32; 2]) -> Self {
        Value::Vec2 { x: v[0], y: v[1] }
    }
}

impl From<[f32; 3]> for Value {
    fn from(v: [f32; 3]) -> Self {
        Value::Vec3 {
            x: v[0],
            y: v[1],
            z: v[2],
        }
    }
}

impl From<Vec<f32>> for Value {
    fn from(v: Vec<f32>) -> Self {
        Value::Array(v)
    }
}
