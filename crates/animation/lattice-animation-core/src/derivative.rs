//! Time derivatives of property values (graph-editor speed curves, motion blur).

use crate::data::AnimatableProperty;
use crate::error::{check_frame, EvalError};
use crate::sampling::evaluate_property;
use lattice_api_core::Value;

/// Half-width, in frames, of the symmetric difference window.
pub const DEFAULT_DERIVATIVE_EPSILON: f64 = 0.5;

fn diff_vec(a: &[f32], b: &[f32], inv_dt: f32) -> Vec<f32> {
    a.iter()
        .zip(b.iter())
        .map(|(cur, prev)| (cur - prev) * inv_dt)
        .collect()
}

/// `(current - previous) / dt` for numeric kinds.
///
/// Returns `None` where a derivative is not meaningful (colors, booleans,
/// text, mismatched kinds, mismatched array lengths) or when `dt <= 0`.
pub(crate) fn derivative_value(current: &Value, previous: &Value, dt: f32) -> Option<Value> {
    if dt <= 0.0 {
        return None;
    }
    let inv_dt = dt.recip();
    match (current, previous) {
        (Value::Number(c), Value::Number(p)) => Some(Value::Number((c - p) * inv_dt)),
        (Value::Vec2 { x: cx, y: cy }, Value::Vec2 { x: px, y: py }) => Some(Value::Vec2 {
            x: (cx - px) * inv_dt,
            y: (cy - py) * inv_dt,
        }),
        (
            Value::Vec3 {
                x: cx,
                y: cy,
                z: cz,
            },
            Value::Vec3 {
                x: px,
                y: py,
                z: pz,
            },
        ) => Some(Value::Vec3 {
            x: (cx - px) * inv_dt,
            y: (cy - py) * inv_dt,
            z: (cz - pz) * inv_dt,
        }),
        (Value::Array(c), Value::Array(p)) if c.len() == p.len() => {
            Some(Value::Array(diff_vec(c, p, inv_dt)))
        }
        _ => None,
    }
}

/// Rate of change of `property` at `frame`, in value units per second.
pub fn evaluate_velocity(
    property: &AnimatableProperty,
    frame: f64,
    fps: f32,
) -> Result<Option<Value>, EvalError> {
    evaluate_velocity_epsilon(property, frame, fps, DEFAULT_DERIVATIVE_EPSILON)
}

/// [`evaluate_velocity`] with an explicit half-window in frames.
pub fn evaluate_velocity_epsilon(
    property: &AnimatableProperty,
    frame: f64,
    fps: f32,
    epsilon: f64,
) -> Result<Option<Value>, EvalError> {
    let frame = check_frame(frame)?;
    if !(fps.is_finite() && fps > 0.0) {
        return Ok(None);
    }
    let eps = if epsilon.is_finite() && epsilon > 0.0 {
        epsilon
    } else {
        DEFAULT_DERIVATIVE_EPSILON
    };
    let forward = evaluate_property(property, frame + eps)?;
    let backward = evaluate_property(property, frame - eps)?;
    let dt_seconds = (2.0 * eps) as f32 / fps;
    Ok(derivative_value(&forward, &backward, dt_seconds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Keyframe;

    #[test]
    fn linear_ramp_has_constant_speed() {
        // 0 -> 100 over 100 frames at 25 fps = 25 units/s
        let p = AnimatableProperty::keyframed(
            "x",
            vec![Keyframe::linear(0.0, 0.0), Keyframe::linear(100.0, 100.0)],
        );
        match evaluate_velocity(&p, 40.0, 25.0).unwrap() {
            Some(Value::Number(v)) => assert!((v - 25.0).abs() < 1e-3, "v {v}"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn colors_have_no_velocity() {
        let p = AnimatableProperty::keyframed(
            "c",
            vec![
                Keyframe::linear(0.0, Value::color("#000000")),
                Keyframe::linear(10.0, Value::color("#ffffff")),
            ],
        );
        assert_eq!(evaluate_velocity(&p, 5.0, 30.0).unwrap(), None);
    }
}
