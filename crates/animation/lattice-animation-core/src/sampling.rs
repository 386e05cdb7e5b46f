//! Uncached property sampling.
//!
//! Model:
//! - Keyframes are authored in any order; sampling works on a frame-sorted
//!   view (stable, so equal frames keep authoring order).
//! - Before the first keyframe and after the last one the value is flat.
//! - Inside, the segment `k_i.frame <= frame < k_{i+1}.frame` is shaped by
//!   `k_i`'s interpolation mode and blended by value kind.

use log::warn;

use crate::data::{AnimatableProperty, Keyframe};
use crate::error::{check_frame, EvalError};
use crate::interp::functions::{interpolate, step_value};
use crate::interp::shape_progress;
use lattice_api_core::Value;

/// Where a frame falls relative to a sorted keyframe list.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Segment {
    /// At or before the first keyframe, or a single keyframe.
    First,
    /// At or after the last keyframe.
    Last,
    /// Strictly inside `[i, i + 1)`.
    Between(usize),
}

/// Frame-sorted view of the keyframes, skipping any with a non-finite frame.
pub fn sorted_keyframes<'a>(property_id: &str, keyframes: &'a [Keyframe]) -> Vec<&'a Keyframe> {
    let mut sorted: Vec<&Keyframe> = Vec::with_capacity(keyframes.len());
    for k in keyframes {
        if k.frame.is_finite() {
            sorted.push(k);
        } else {
            warn!(
                "dropping keyframe '{}' with non-finite frame {} on '{}'",
                k.id, k.frame, property_id
            );
        }
    }
    sorted.sort_by(|a, b| a.frame.total_cmp(&b.frame));
    sorted
}

pub(crate) fn find_segment(points: &[&Keyframe], frame: f64) -> Segment {
    let n = points.len();
    if n <= 1 || frame <= points[0].frame {
        return Segment::First;
    }
    if frame >= points[n - 1].frame {
        return Segment::Last;
    }
    // first.frame < frame < last.frame, so 1 <= idx <= n - 1
    let idx = points.partition_point(|k| k.frame <= frame);
    Segment::Between(idx - 1)
}

/// Sample an already sorted, non-empty keyframe list.
pub(crate) fn sample_sorted(points: &[&Keyframe], frame: f64) -> Value {
    match find_segment(points, frame) {
        Segment::First => points[0].value.clone(),
        Segment::Last => points[points.len() - 1].value.clone(),
        Segment::Between(i) => {
            let left = points[i];
            let right = points[i + 1];
            let duration = right.frame - left.frame;
            if duration <= 0.0 {
                // Zero-length segment: the later keyframe wins.
                return right.value.clone();
            }
            let t = ((frame - left.frame) / duration) as f32;
            match shape_progress(left, right, t) {
                Some(eased) => interpolate(&left.value, &right.value, eased),
                None => step_value(&left.value),
            }
        }
    }
}

/// Evaluate a property at `frame` without any caching.
pub fn evaluate_property(property: &AnimatableProperty, frame: f64) -> Result<Value, EvalError> {
    let frame = check_frame(frame)?;
    if property.is_static() {
        return Ok(property.value.clone());
    }
    let points = sorted_keyframes(property.id.as_str(), &property.keyframes);
    if points.is_empty() {
        return Ok(property.value.clone());
    }
    Ok(sample_sorted(&points, frame))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Keyframe;

    fn frames(list: &[f64]) -> Vec<Keyframe> {
        list.iter().map(|f| Keyframe::linear(*f, *f)).collect()
    }

    #[test]
    fn segment_lookup() {
        let owned = frames(&[0.0, 10.0, 20.0]);
        let pts: Vec<&Keyframe> = owned.iter().collect();
        assert_eq!(find_segment(&pts, -5.0), Segment::First);
        assert_eq!(find_segment(&pts, 0.0), Segment::First);
        assert_eq!(find_segment(&pts, 0.5), Segment::Between(0));
        assert_eq!(find_segment(&pts, 10.0), Segment::Between(1));
        assert_eq!(find_segment(&pts, 19.99), Segment::Between(1));
        assert_eq!(find_segment(&pts, 20.0), Segment::Last);
    }

    #[test]
    fn duplicate_frames_resolve_to_later_keyframe() {
        let mut owned = frames(&[0.0, 10.0, 10.0, 20.0]);
        owned[1].value = Value::number(100.0);
        owned[2].value = Value::number(200.0);
        let pts: Vec<&Keyframe> = owned.iter().collect();
        // Exactly at the duplicated frame the segment starting at the second copy is active.
        assert_eq!(sample_sorted(&pts, 10.0), Value::number(200.0));
    }

    #[test]
    fn non_finite_keyframes_are_skipped() {
        let mut owned = frames(&[0.0, 10.0]);
        owned.push(Keyframe::linear(f64::NAN, 99.0));
        let pts = sorted_keyframes("p", &owned);
        assert_eq!(pts.len(), 2);
    }
}
