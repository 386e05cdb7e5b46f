//! Cubic-bezier timing from keyframe handles.
//!
//! A segment's curve runs from (0,0) to (1,1) in normalized (time, progress)
//! space. The outgoing handle of the left keyframe gives P1, the incoming
//! handle of the right keyframe gives P2:
//!   P1 = (out.frame / duration,     out.value / value_delta)
//!   P2 = (1 + in.frame / duration,  1 + in.value / value_delta)
//! X coordinates are clamped to [0,1] so the curve stays a function of time.

use crate::data::BezierHandle;

/// Cubic Bezier basis with P0 = 0 and P3 = 1.
#[inline]
fn cubic(p1: f32, p2: f32, t: f32) -> f32 {
    let u = 1.0 - t;
    3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t
}

#[inline]
fn cubic_derivative(p1: f32, p2: f32, t: f32) -> f32 {
    let u = 1.0 - t;
    3.0 * u * u * p1 + 6.0 * u * t * (p2 - p1) + 3.0 * t * t * (1.0 - p2)
}

/// Find the curve parameter whose x equals `x`.
/// Newton-Raphson first, bisection if it fails to converge.
fn solve_parameter(x: f32, x1: f32, x2: f32) -> f32 {
    let mut s = x;
    for _ in 0..8 {
        let err = cubic(x1, x2, s) - x;
        if err.abs() < 1e-6 {
            return s;
        }
        let d = cubic_derivative(x1, x2, s);
        if d.abs() < 1e-6 {
            break;
        }
        s = (s - err / d).clamp(0.0, 1.0);
    }

    let mut lo = 0.0f32;
    let mut hi = 1.0f32;
    s = x;
    for _ in 0..24 {
        let cx = cubic(x1, x2, s);
        if (cx - x).abs() < 1e-6 {
            break;
        }
        if cx < x {
            lo = s;
        } else {
            hi = s;
        }
        s = 0.5 * (lo + hi);
    }
    s
}

/// Eased progress for normalized time `t` on the curve with control points
/// (x1, y1) and (x2, y2).
pub fn cubic_bezier_ease(t: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t == 0.0 || t == 1.0 {
        return t;
    }
    let x1 = x1.clamp(0.0, 1.0);
    let x2 = x2.clamp(0.0, 1.0);
    // Control points on the diagonal describe the identity curve.
    if x1 == y1 && x2 == y2 {
        return t;
    }
    let s = solve_parameter(t, x1, x2);
    cubic(y1, y2, s)
}

/// Eased progress for a keyframe segment.
///
/// `duration` is the segment length in frames, `value_delta` the signed (or
/// magnitude) value change across it. Returns `t` untouched when either
/// handle is disabled.
pub fn solve_handles(
    out_handle: &BezierHandle,
    in_handle: &BezierHandle,
    duration: f32,
    value_delta: f32,
    t: f32,
) -> f32 {
    if !out_handle.enabled || !in_handle.enabled {
        return t;
    }
    if !(duration.is_finite() && duration > 0.0) {
        return t;
    }
    let x1 = (out_handle.frame / duration).clamp(0.0, 1.0);
    let x2 = (1.0 + in_handle.frame / duration).clamp(0.0, 1.0);
    let (y1, y2) = if value_delta.abs() > f32::EPSILON && value_delta.is_finite() {
        (
            out_handle.value / value_delta,
            1.0 + in_handle.value / value_delta,
        )
    } else {
        // No value change to normalize against; keep timing only.
        (x1, x2)
    };
    cubic_bezier_ease(t, x1, y1, x2, y2)
}
