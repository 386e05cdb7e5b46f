//! Coercion helpers between Value kinds.
//! Used where a single magnitude is needed from a value pair (bezier value
//! normalization, velocity sampling) without caring about the concrete kind.

use crate::color::Rgba8;
use crate::Value;

/// Flatten a Value into numeric components.
/// - Number -> single element
/// - Vec2/Vec3 -> components in field order
/// - Color -> 0..=255 RGBA channels, empty if unparsable
/// - Array -> clone
/// - Bool/Text -> empty
pub fn to_components(v: &Value) -> Vec<f32> {
    match v {
        Value::Number(n) => vec![*n],
        Value::Vec2 { x, y } => vec![*x, *y],
        Value::Vec3 { x, y, z } => vec![*x, *y, *z],
        Value::Color(hex) => Rgba8::parse(hex)
            .map(|(c, _)| c.channels().to_vec())
            .unwrap_or_default(),
        Value::Array(items) => items.clone(),
        Value::Bool(_) | Value::Text(_) => Vec::new(),
    }
}

/// Coerce a Value into a scalar f32.
/// Rules:
/// - Number -> its value
/// - Bool -> 1.0 / 0.0
/// - Vec2/Vec3/Array -> first component (0.0 if empty)
/// - Color/Text -> 0.0
pub fn to_number(v: &Value) -> f32 {
    match v {
        Value::Number(n) => *n,
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::Vec2 { x, .. } | Value::Vec3 { x, .. } => *x,
        Value::Array(items) => items.first().copied().unwrap_or(0.0),
        Value::Color(_) | Value::Text(_) => 0.0,
    }
}

/// Signed scalar delta for numbers, Euclidean distance for multi-component kinds.
/// Returns None when the pair has no numeric span (mismatched or step kinds).
pub fn value_delta(a: &Value, b: &Value) -> Option<f32> {
    if let (Value::Number(va), Value::Number(vb)) = (a, b) {
        return Some(vb - va);
    }
    if a.kind() != b.kind() || !a.kind().is_interpolable() {
        return None;
    }
    let ca = to_components(a);
    let cb = to_components(b);
    if ca.is_empty() || ca.len() != cb.len() {
        return None;
    }
    let sum: f32 = ca
        .iter()
        .zip(cb.iter())
        .map(|(x, y)| (y - x) * (y - x))
        .sum();
    Some(sum.sqrt())
}
