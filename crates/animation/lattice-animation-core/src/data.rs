//! Animatable property data model as authored by the document layer.
//! Value/ValueKind live in lattice-api-core.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ids::PropertyId;
use crate::interp::easing::EasingId;
use lattice_api_core::Value;

/// Bezier handle relative to its owning keyframe: offsets in frames and value units.
/// A disabled handle makes the segment behave exactly like linear.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BezierHandle {
    pub frame: f32,
    pub value: f32,
    #[serde(default)]
    pub enabled: bool,
}

impl BezierHandle {
    pub fn new(frame: f32, value: f32) -> Self {
        Self {
            frame,
            value,
            enabled: true,
        }
    }

    pub fn disabled() -> Self {
        Self::default()
    }
}

/// How a segment is shaped from this keyframe to the next one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Interpolation {
    Hold,
    #[default]
    Linear,
    Bezier,
    Easing(EasingId),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown interpolation '{0}'")]
pub struct UnknownInterpolation(pub String);

impl FromStr for Interpolation {
    type Err = UnknownInterpolation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hold" => Ok(Interpolation::Hold),
            "linear" => Ok(Interpolation::Linear),
            "bezier" => Ok(Interpolation::Bezier),
            other => other
                .parse::<EasingId>()
                .map(Interpolation::Easing)
                .map_err(|_| UnknownInterpolation(other.to_string())),
        }
    }
}

impl TryFrom<String> for Interpolation {
    type Error = UnknownInterpolation;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Interpolation> for String {
    fn from(i: Interpolation) -> Self {
        i.to_string()
    }
}

impl fmt::Display for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interpolation::Hold => f.write_str("hold"),
            Interpolation::Linear => f.write_str("linear"),
            Interpolation::Bezier => f.write_str("bezier"),
            Interpolation::Easing(id) => fmt::Display::fmt(id, f),
        }
    }
}

/// A single keyframe. `frame` is in composition frames and may be negative,
/// fractional, or out of order relative to its siblings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Keyframe {
    #[serde(default)]
    pub id: String,
    pub frame: f64,
    pub value: Value,
    #[serde(default)]
    pub interpolation: Interpolation,
    #[serde(default)]
    pub in_handle: BezierHandle,
    #[serde(default)]
    pub out_handle: BezierHandle,
}

impl Keyframe {
    pub fn new(frame: f64, value: impl Into<Value>, interpolation: Interpolation) -> Self {
        Self {
            id: String::new(),
            frame,
            value: value.into(),
            interpolation,
            in_handle: BezierHandle::disabled(),
            out_handle: BezierHandle::disabled(),
        }
    }

    pub fn linear(frame: f64, value: impl Into<Value>) -> Self {
        Self::new(frame, value, Interpolation::Linear)
    }

    pub fn hold(frame: f64, value: impl Into<Value>) -> Self {
        Self::new(frame, value, Interpolation::Hold)
    }

    pub fn with_handles(mut self, in_handle: BezierHandle, out_handle: BezierHandle) -> Self {
        self.in_handle = in_handle;
        self.out_handle = out_handle;
        self
    }
}

/// A property that is either a constant or driven by keyframes.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnimatableProperty {
    pub id: PropertyId,
    #[serde(default)]
    pub name: String,
    pub value: Value,
    #[serde(default)]
    pub animated: bool,
    #[serde(default)]
    pub keyframes: Vec<Keyframe>,
}

impl AnimatableProperty {
    /// Constant, non-animated property.
    pub fn constant(id: impl Into<PropertyId>, value: impl Into<Value>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            value: value.into(),
            animated: false,
            keyframes: Vec::new(),
        }
    }

    /// Animated property; the static value defaults to the first keyframe's value.
    pub fn keyframed(id: impl Into<PropertyId>, keyframes: Vec<Keyframe>) -> Self {
        let value = keyframes
            .first()
            .map(|k| k.value.clone())
            .unwrap_or(Value::Number(0.0));
        Self {
            id: id.into(),
            name: String::new(),
            value,
            animated: true,
            keyframes,
        }
    }

    /// True when evaluation always yields the static value.
    #[inline]
    pub fn is_static(&self) -> bool {
        !self.animated || self.keyframes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interp::easing::EasingId;

    #[test]
    fn interpolation_round_trips_as_string() {
        for (s, i) in [
            ("hold", Interpolation::Hold),
            ("linear", Interpolation::Linear),
            ("bezier", Interpolation::Bezier),
            ("easeInOutCubic", Interpolation::Easing(EasingId::EaseInOutCubic)),
        ] {
            assert_eq!(s.parse::<Interpolation>().unwrap(), i);
            assert_eq!(i.to_string(), s);
        }
        assert!("wobble".parse::<Interpolation>().is_err());
    }

    #[test]
    fn unknown_names_are_std_errors() {
        fn as_error<E: std::error::Error>(e: E) -> String {
            e.to_string()
        }
        let err = "wobble".parse::<Interpolation>().unwrap_err();
        assert_eq!(as_error(err), "unknown interpolation 'wobble'");
        let err = "easeSideways".parse::<EasingId>().unwrap_err();
        assert_eq!(as_error(err), "unknown easing 'easeSideways'");

        let bad = serde_json::from_value::<Keyframe>(serde_json::json!({
            "frame": 0,
            "value": { "type": "number", "data": 1 },
            "interpolation": "wobble"
        }))
        .unwrap_err();
        assert!(bad.to_string().contains("unknown interpolation 'wobble'"), "{bad}");
    }

    #[test]
    fn keyframe_json_defaults() {
        let kf: Keyframe = serde_json::from_value(serde_json::json!({
            "frame": 12,
            "value": { "type": "number", "data": 3.5 },
            "interpolation": "easeOutBack"
        }))
        .unwrap();
        assert_eq!(kf.frame, 12.0);
        assert_eq!(kf.interpolation, Interpolation::Easing(EasingId::EaseOutBack));
        assert!(!kf.in_handle.enabled && !kf.out_handle.enabled);
    }

    #[test]
    fn static_when_not_animated_or_empty() {
        let mut p = AnimatableProperty::keyframed("p", vec![Keyframe::linear(0.0, 1.0)]);
        assert!(!p.is_static());
        p.animated = false;
        assert!(p.is_static());
        p.animated = true;
        p.keyframes.clear();
        assert!(p.is_static());
    }
}
