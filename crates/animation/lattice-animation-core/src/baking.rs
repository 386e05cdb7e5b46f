//! Baking API: sample a property across a frame range.

use serde::{Deserialize, Serialize};

use crate::data::AnimatableProperty;
use crate::error::{check_frame, EvalError};
use crate::ids::PropertyId;
use crate::sampling::{sample_sorted, sorted_keyframes};
use lattice_api_core::Value;

/// Upper bound on baked samples per property.
pub const MAX_BAKED_SAMPLES: usize = 1 << 20;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct BakeConfig {
    /// First frame (inclusive).
    pub start_frame: f64,
    /// Last frame (inclusive); clamped up to `start_frame`.
    pub end_frame: f64,
    /// Distance between samples in frames; non-positive values fall back to 1.
    pub step: f64,
}

impl Default for BakeConfig {
    fn default() -> Self {
        Self {
            start_frame: 0.0,
            end_frame: 100.0,
            step: 1.0,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BakedProperty {
    pub property: PropertyId,
    pub start_frame: f64,
    pub step: f64,
    /// Sampled values at `start_frame + i * step`.
    pub values: Vec<Value>,
}

impl BakedProperty {
    /// Frame of the i-th sample.
    pub fn frame_at(&self, index: usize) -> f64 {
        self.start_frame + index as f64 * self.step
    }
}

/// Bake a property using the provided config.
///
/// Sorting happens once for the whole range; each sample matches what
/// `evaluate_property` returns for the same frame.
pub fn bake_property(
    property: &AnimatableProperty,
    cfg: &BakeConfig,
) -> Result<BakedProperty, EvalError> {
    let start = check_frame(cfg.start_frame)?;
    let end = check_frame(cfg.end_frame)?.max(start);
    let step = if cfg.step.is_finite() && cfg.step > 0.0 {
        cfg.step
    } else {
        1.0
    };
    let count = (((end - start) / step).floor() as usize)
        .saturating_add(1)
        .min(MAX_BAKED_SAMPLES);

    let points = if property.is_static() {
        Vec::new()
    } else {
        sorted_keyframes(property.id.as_str(), &property.keyframes)
    };

    let mut values = Vec::with_capacity(count);
    for i in 0..count {
        let frame = start + i as f64 * step;
        let v = if points.is_empty() {
            property.value.clone()
        } else {
            sample_sorted(&points, frame)
        };
        values.push(v);
    }

    Ok(BakedProperty {
        property: property.id.clone(),
        start_frame: start,
        step,
        values,
    })
}

/// Export baked data as serde_json::Value (stable schema for hosts).
pub fn export_baked_json(baked: &BakedProperty) -> serde_json::Value {
    serde_json::to_value(baked).unwrap_or(serde_json::Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Keyframe;
    use crate::sampling::evaluate_property;

    #[test]
    fn bake_matches_point_evaluation() {
        let p = AnimatableProperty::keyframed(
            "opacity",
            vec![
                Keyframe::linear(10.0, 0.0),
                Keyframe::hold(20.0, 50.0),
                Keyframe::linear(30.0, 100.0),
            ],
        );
        let baked = bake_property(
            &p,
            &BakeConfig {
                start_frame: 0.0,
                end_frame: 40.0,
                step: 0.5,
            },
        )
        .unwrap();
        assert_eq!(baked.values.len(), 81);
        for (i, v) in baked.values.iter().enumerate() {
            assert_eq!(*v, evaluate_property(&p, baked.frame_at(i)).unwrap());
        }
    }

    #[test]
    fn bad_step_and_reversed_range_are_sanitized() {
        let p = AnimatableProperty::constant("c", 3.0);
        let baked = bake_property(
            &p,
            &BakeConfig {
                start_frame: 5.0,
                end_frame: 1.0,
                step: -2.0,
            },
        )
        .unwrap();
        assert_eq!(baked.step, 1.0);
        assert_eq!(baked.values, vec![Value::number(3.0)]);
        let json = export_baked_json(&baked);
        assert_eq!(json["property"], "c");
    }

    #[test]
    fn non_finite_range_is_rejected() {
        let p = AnimatableProperty::constant("c", 3.0);
        let cfg = BakeConfig {
            start_frame: f64::NAN,
            ..BakeConfig::default()
        };
        assert!(bake_property(&p, &cfg).is_err());
    }
}
