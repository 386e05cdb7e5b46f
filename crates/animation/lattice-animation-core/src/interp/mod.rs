//! Interpolation, easing and bezier timing.
//!
//! `functions` blends values, `easing` shapes progress by name, `bezier`
//! shapes progress from keyframe handles. `shape_progress` picks between
//! them for one segment.

pub mod bezier;
pub mod easing;
pub mod functions;

use crate::data::{Interpolation, Keyframe};
use lattice_api_core::coercion::value_delta;

/// Eased progress for the segment `left -> right` at linear progress `t`.
/// Returns None for hold segments, which never leave the left value.
pub fn shape_progress(left: &Keyframe, right: &Keyframe, t: f32) -> Option<f32> {
    match left.interpolation {
        Interpolation::Hold => None,
        Interpolation::Linear => Some(t),
        Interpolation::Easing(id) => Some(id.apply(t)),
        Interpolation::Bezier => {
            let duration = (right.frame - left.frame) as f32;
            let delta = value_delta(&left.value, &right.value).unwrap_or(0.0);
            Some(bezier::solve_handles(
                &left.out_handle,
                &right.in_handle,
                duration,
                delta,
                t,
            ))
        }
    }
}
