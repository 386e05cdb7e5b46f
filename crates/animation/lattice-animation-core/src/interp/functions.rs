//! Interpolation helpers:
//! - lerp on scalars, named-field vectors and numeric arrays (elementwise)
//! - hex color blending in 0..=255 channel space
//! - pass-through for step-only or mismatched kinds
//!
//! `t` is never clamped here; callers decide.

use lattice_api_core::{Rgba8, Value};

/// Linear interpolation of scalars.
#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Elementwise lerp. The common prefix is blended, any tail of `a` is kept.
pub fn lerp_slice(a: &[f32], b: &[f32], t: f32) -> Vec<f32> {
    let mut out = a.to_vec();
    for (slot, (va, vb)) in out.iter_mut().zip(a.iter().zip(b.iter())) {
        *slot = lerp_f32(*va, *vb, t);
    }
    out
}

/// Blend two hex colors channel by channel. Output keeps `a`'s hex width.
/// Returns None if either side fails to parse.
pub fn lerp_hex(a: &str, b: &str, t: f32) -> Option<String> {
    let (ca, width) = Rgba8::parse(a).ok()?;
    let (cb, _) = Rgba8::parse(b).ok()?;
    let (pa, pb) = (ca.channels(), cb.channels());
    let mixed = Rgba8::from_channels([
        lerp_f32(pa[0], pb[0], t),
        lerp_f32(pa[1], pb[1], t),
        lerp_f32(pa[2], pb[2], t),
        lerp_f32(pa[3], pb[3], t),
    ]);
    Some(mixed.to_hex(width))
}

/// Step interpolation: choose left value.
#[inline]
pub fn step_value(a: &Value) -> Value {
    a.clone()
}

/// Interpolate across Value kinds.
pub fn interpolate(a: &Value, b: &Value, t: f32) -> Value {
    match (a, b) {
        (Value::Number(va), Value::Number(vb)) => Value::Number(lerp_f32(*va, *vb, t)),
        (Value::Vec2 { x: ax, y: ay }, Value::Vec2 { x: bx, y: by }) => Value::Vec2 {
            x: lerp_f32(*ax, *bx, t),
            y: lerp_f32(*ay, *by, t),
        },
        (
            Value::Vec3 {
                x: ax,
                y: ay,
                z: az,
            },
            Value::Vec3 {
                x: bx,
                y: by,
                z: bz,
            },
        ) => Value::Vec3 {
            x: lerp_f32(*ax, *bx, t),
            y: lerp_f32(*ay, *by, t),
            z: lerp_f32(*az, *bz, t),
        },
        (Value::Color(ca), Value::Color(cb)) => match lerp_hex(ca, cb, t) {
            Some(hex) => Value::Color(hex),
            None => step_value(a),
        },
        (Value::Array(va), Value::Array(vb)) => Value::Array(lerp_slice(va, vb, t)),
        // Bool/Text and mismatched kinds: prefer left (fail-soft).
        _ => step_value(a),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vectors_are_elementwise() {
        let v = interpolate(&Value::vec3(0.0, 10.0, -4.0), &Value::vec3(2.0, 20.0, 4.0), 0.5);
        assert_eq!(v, Value::vec3(1.0, 15.0, 0.0));
    }

    #[test]
    fn t_is_not_clamped() {
        assert_eq!(
            interpolate(&Value::number(0.0), &Value::number(10.0), 1.5),
            Value::number(15.0)
        );
    }

    #[test]
    fn colors_blend_per_channel_lowercase() {
        let v = interpolate(&Value::color("#000000"), &Value::color("#FF8040"), 0.5);
        assert_eq!(v, Value::color("#804020"));
    }

    #[test]
    fn color_keeps_alpha_width() {
        let v = interpolate(
            &Value::color("#ff000000"),
            &Value::color("#ff0000ff"),
            0.5,
        );
        assert_eq!(v, Value::color("#ff000080"));
    }

    #[test]
    fn bad_color_passes_through() {
        let a = Value::color("not-a-color");
        assert_eq!(interpolate(&a, &Value::color("#ffffff"), 0.5), a);
    }

    #[test]
    fn arrays_of_different_length_keep_left_tail() {
        let v = interpolate(
            &Value::Array(vec![0.0, 0.0, 7.0]),
            &Value::Array(vec![10.0, 20.0]),
            0.5,
        );
        assert_eq!(v, Value::Array(vec![5.0, 10.0, 7.0]));
    }

    #[test]
    fn step_kinds_and_mismatches_hold_left() {
        let a = Value::Text("a".into());
        assert_eq!(interpolate(&a, &Value::Text("b".into()), 0.9), a);
        let n = Value::number(1.0);
        assert_eq!(interpolate(&n, &Value::vec2(0.0, 0.0), 0.5), n);
    }
}
