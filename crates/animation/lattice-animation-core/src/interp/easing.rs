//! Named easing curves.
//!
//! Every curve maps 0 -> 0 and 1 -> 1. Back and elastic variants overshoot
//! the unit interval in between; nothing here clamps.

use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EasingId {
    Linear,
    EaseInSine,
    EaseOutSine,
    EaseInOutSine,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    EaseInQuart,
    EaseOutQuart,
    EaseInOutQuart,
    EaseInQuint,
    EaseOutQuint,
    EaseInOutQuint,
    EaseInExpo,
    EaseOutExpo,
    EaseInOutExpo,
    EaseInCirc,
    EaseOutCirc,
    EaseInOutCirc,
    EaseInBack,
    EaseOutBack,
    EaseInOutBack,
    EaseInElastic,
    EaseOutElastic,
    EaseInOutElastic,
    EaseInBounce,
    EaseOutBounce,
    EaseInOutBounce,
}

const BACK_C1: f32 = 1.70158;
const BACK_C2: f32 = BACK_C1 * 1.525;
const BACK_C3: f32 = BACK_C1 + 1.0;
const ELASTIC_C4: f32 = (2.0 * PI) / 3.0;
const ELASTIC_C5: f32 = (2.0 * PI) / 4.5;

impl EasingId {
    pub const ALL: [EasingId; 31] = [
        EasingId::Linear,
        EasingId::EaseInSine,
        EasingId::EaseOutSine,
        EasingId::EaseInOutSine,
        EasingId::EaseInQuad,
        EasingId::EaseOutQuad,
        EasingId::EaseInOutQuad,
        EasingId::EaseInCubic,
        EasingId::EaseOutCubic,
        EasingId::EaseInOutCubic,
        EasingId::EaseInQuart,
        EasingId::EaseOutQuart,
        EasingId::EaseInOutQuart,
        EasingId::EaseInQuint,
        EasingId::EaseOutQuint,
        EasingId::EaseInOutQuint,
        EasingId::EaseInExpo,
        EasingId::EaseOutExpo,
        EasingId::EaseInOutExpo,
        EasingId::EaseInCirc,
        EasingId::EaseOutCirc,
        EasingId::EaseInOutCirc,
        EasingId::EaseInBack,
        EasingId::EaseOutBack,
        EasingId::EaseInOutBack,
        EasingId::EaseInElastic,
        EasingId::EaseOutElastic,
        EasingId::EaseInOutElastic,
        EasingId::EaseInBounce,
        EasingId::EaseOutBounce,
        EasingId::EaseInOutBounce,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EasingId::Linear => "linear",
            EasingId::EaseInSine => "easeInSine",
            EasingId::EaseOutSine => "easeOutSine",
            EasingId::EaseInOutSine => "easeInOutSine",
            EasingId::EaseInQuad => "easeInQuad",
            EasingId::EaseOutQuad => "easeOutQuad",
            EasingId::EaseInOutQuad => "easeInOutQuad",
            EasingId::EaseInCubic => "easeInCubic",
            EasingId::EaseOutCubic => "easeOutCubic",
            EasingId::EaseInOutCubic => "easeInOutCubic",
            EasingId::EaseInQuart => "easeInQuart",
            EasingId::EaseOutQuart => "easeOutQuart",
            EasingId::EaseInOutQuart => "easeInOutQuart",
            EasingId::EaseInQuint => "easeInQuint",
            EasingId::EaseOutQuint => "easeOutQuint",
            EasingId::EaseInOutQuint => "easeInOutQuint",
            EasingId::EaseInExpo => "easeInExpo",
            EasingId::EaseOutExpo => "easeOutExpo",
            EasingId::EaseInOutExpo => "easeInOutExpo",
            EasingId::EaseInCirc => "easeInCirc",
            EasingId::EaseOutCirc => "easeOutCirc",
            EasingId::EaseInOutCirc => "easeInOutCirc",
            EasingId::EaseInBack => "easeInBack",
            EasingId::EaseOutBack => "easeOutBack",
            EasingId::EaseInOutBack => "easeInOutBack",
            EasingId::EaseInElastic => "easeInElastic",
            EasingId::EaseOutElastic => "easeOutElastic",
            EasingId::EaseInOutElastic => "easeInOutElastic",
            EasingId::EaseInBounce => "easeInBounce",
            EasingId::EaseOutBounce => "easeOutBounce",
            EasingId::EaseInOutBounce => "easeInOutBounce",
        }
    }

    /// Shape normalized progress `t`.
    pub fn apply(self, t: f32) -> f32 {
        match self {
            EasingId::Linear => t,
            EasingId::EaseInSine => 1.0 - (t * PI / 2.0).cos(),
            EasingId::EaseOutSine => (t * PI / 2.0).sin(),
            EasingId::EaseInOutSine => -((PI * t).cos() - 1.0) / 2.0,
            EasingId::EaseInQuad => t * t,
            EasingId::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            EasingId::EaseInOutQuad => in_out_pow(t, 2),
            EasingId::EaseInCubic => t.powi(3),
            EasingId::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            EasingId::EaseInOutCubic => in_out_pow(t, 3),
            EasingId::EaseInQuart => t.powi(4),
            EasingId::EaseOutQuart => 1.0 - (1.0 - t).powi(4),
            EasingId::EaseInOutQuart => in_out_pow(t, 4),
            EasingId::EaseInQuint => t.powi(5),
            EasingId::EaseOutQuint => 1.0 - (1.0 - t).powi(5),
            EasingId::EaseInOutQuint => in_out_pow(t, 5),
            EasingId::EaseInExpo => {
                if t == 0.0 {
                    0.0
                } else {
                    2f32.powf(10.0 * t - 10.0)
                }
            }
            EasingId::EaseOutExpo => {
                if t == 1.0 {
                    1.0
                } else {
                    1.0 - 2f32.powf(-10.0 * t)
                }
            }
            EasingId::EaseInOutExpo => {
                if t == 0.0 {
                    0.0
                } else if t == 1.0 {
                    1.0
                } else if t < 0.5 {
                    2f32.powf(20.0 * t - 10.0) / 2.0
                } else {
                    (2.0 - 2f32.powf(-20.0 * t + 10.0)) / 2.0
                }
            }
            EasingId::EaseInCirc => 1.0 - (1.0 - t * t).max(0.0).sqrt(),
            EasingId::EaseOutCirc => (1.0 - (t - 1.0) * (t - 1.0)).max(0.0).sqrt(),
            EasingId::EaseInOutCirc => {
                if t < 0.5 {
                    (1.0 - (1.0 - (2.0 * t).powi(2)).max(0.0).sqrt()) / 2.0
                } else {
                    ((1.0 - (-2.0 * t + 2.0).powi(2)).max(0.0).sqrt() + 1.0) / 2.0
                }
            }
            EasingId::EaseInBack => BACK_C3 * t * t * t - BACK_C1 * t * t,
            EasingId::EaseOutBack => {
                let u = t - 1.0;
                1.0 + BACK_C3 * u * u * u + BACK_C1 * u * u
            }
            EasingId::EaseInOutBack => {
                if t < 0.5 {
                    ((2.0 * t).powi(2) * ((BACK_C2 + 1.0) * 2.0 * t - BACK_C2)) / 2.0
                } else {
                    ((2.0 * t - 2.0).powi(2) * ((BACK_C2 + 1.0) * (t * 2.0 - 2.0) + BACK_C2)
                        + 2.0)
                        / 2.0
                }
            }
            EasingId::EaseInElastic => {
                if t == 0.0 || t == 1.0 {
                    t
                } else {
                    -(2f32.powf(10.0 * t - 10.0)) * ((t * 10.0 - 10.75) * ELASTIC_C4).sin()
                }
            }
            EasingId::EaseOutElastic => {
                if t == 0.0 || t == 1.0 {
                    t
                } else {
                    2f32.powf(-10.0 * t) * ((t * 10.0 - 0.75) * ELASTIC_C4).sin() + 1.0
                }
            }
            EasingId::EaseInOutElastic => {
                if t == 0.0 || t == 1.0 {
                    t
                } else if t < 0.5 {
                    -(2f32.powf(20.0 * t - 10.0) * ((20.0 * t - 11.125) * ELASTIC_C5).sin())
                        / 2.0
                } else {
                    (2f32.powf(-20.0 * t + 10.0) * ((20.0 * t - 11.125) * ELASTIC_C5).sin())
                        / 2.0
                        + 1.0
                }
            }
            EasingId::EaseInBounce => 1.0 - bounce_out(1.0 - t),
            EasingId::EaseOutBounce => bounce_out(t),
            EasingId::EaseInOutBounce => {
                if t < 0.5 {
                    (1.0 - bounce_out(1.0 - 2.0 * t)) / 2.0
                } else {
                    (1.0 + bounce_out(2.0 * t - 1.0)) / 2.0
                }
            }
        }
    }
}

#[inline]
fn in_out_pow(t: f32, n: i32) -> f32 {
    if t < 0.5 {
        2f32.powi(n - 1) * t.powi(n)
    } else {
        1.0 - (-2.0 * t + 2.0).powi(n) / 2.0
    }
}

fn bounce_out(t: f32) -> f32 {
    const N1: f32 = 7.5625;
    const D1: f32 = 2.75;
    if t < 1.0 / D1 {
        N1 * t * t
    } else if t < 2.0 / D1 {
        let u = t - 1.5 / D1;
        N1 * u * u + 0.75
    } else if t < 2.5 / D1 {
        let u = t - 2.25 / D1;
        N1 * u * u + 0.9375
    } else {
        let u = t - 2.625 / D1;
        N1 * u * u + 0.984375
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown easing '{0}'")]
pub struct UnknownEasing(pub String);

impl FromStr for EasingId {
    type Err = UnknownEasing;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EasingId::ALL
            .iter()
            .copied()
            .find(|e| e.name() == s)
            .ok_or_else(|| UnknownEasing(s.to_string()))
    }
}

impl fmt::Display for EasingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
