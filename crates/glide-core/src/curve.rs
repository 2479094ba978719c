//! Normalized shaping curves.
//!
//! Every curve in this crate maps a normalized time in `[0, 1]` onto a
//! normalized value. Curves are sampled, never inverted analytically; see
//! [`crate::curve_solver`] for the approximate inverse.

use crate::error::ParamsError;
use serde::{Deserialize, Serialize};

/// Anything that can be sampled over the unit interval.
pub trait Curve {
    fn evaluate(&self, t: f32) -> f32;
}

impl<F: Fn(f32) -> f32> Curve for F {
    fn evaluate(&self, t: f32) -> f32 {
        self(t)
    }
}

/// A single animation key: value plus the slopes entering and leaving it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub time: f32,
    pub value: f32,
    #[serde(default)]
    pub in_tangent: f32,
    #[serde(default)]
    pub out_tangent: f32,
}

impl Keyframe {
    pub const fn new(time: f32, value: f32) -> Self {
        Self {
            time,
            value,
            in_tangent: 0.0,
            out_tangent: 0.0,
        }
    }

    pub const fn with_tangents(mut self, in_tangent: f32, out_tangent: f32) -> Self {
        self.in_tangent = in_tangent;
        self.out_tangent = out_tangent;
        self
    }
}

/// Serializable curve description used in parameter records.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveShape {
    /// Straight line from `start` at t=0 to `end` at t=1.
    Linear { start: f32, end: f32 },
    /// Cubic Hermite segments between sorted keys, clamped outside the keys.
    Keyframes(Vec<Keyframe>),
    Constant(f32),
}

impl CurveShape {
    /// `0 -> 1` straight line. Default acceleration shape.
    pub const fn rising() -> Self {
        CurveShape::Linear {
            start: 0.0,
            end: 1.0,
        }
    }

    /// `1 -> 0` straight line. Default inertia shape.
    pub const fn falling() -> Self {
        CurveShape::Linear {
            start: 1.0,
            end: 0.0,
        }
    }

    /// Flat-tangent S curve through (0, 0) and (1, 1).
    pub fn ease_in_out() -> Self {
        CurveShape::Keyframes(vec![Keyframe::new(0.0, 0.0), Keyframe::new(1.0, 1.0)])
    }

    pub fn validate(&self) -> Result<(), ParamsError> {
        match self {
            CurveShape::Linear { start, end } => {
                if !start.is_finite() || !end.is_finite() {
                    return Err(ParamsError::NonFinite { field: "curve" });
                }
            }
            CurveShape::Constant(value) => {
                if !value.is_finite() {
                    return Err(ParamsError::NonFinite { field: "curve" });
                }
            }
            CurveShape::Keyframes(keys) => {
                if keys.is_empty() {
                    return Err(ParamsError::EmptyCurve);
                }
                for (index, pair) in keys.windows(2).enumerate() {
                    if pair[1].time <= pair[0].time {
                        return Err(ParamsError::UnsortedKeys { index: index + 1 });
                    }
                }
                let finite = keys.iter().all(|k| {
                    k.time.is_finite()
                        && k.value.is_finite()
                        && k.in_tangent.is_finite()
                        && k.out_tangent.is_finite()
                });
                if !finite {
                    return Err(ParamsError::NonFinite { field: "curve" });
                }
            }
        }
        Ok(())
    }
}

impl Default for CurveShape {
    fn default() -> Self {
        Self::rising()
    }
}

impl Curve for CurveShape {
    fn evaluate(&self, t: f32) -> f32 {
        match self {
            CurveShape::Linear { start, end } => {
                let t = t.clamp(0.0, 1.0);
                start + (end - start) * t
            }
            CurveShape::Constant(value) => *value,
            CurveShape::Keyframes(keys) => evaluate_keys(keys, t),
        }
    }
}

fn evaluate_keys(keys: &[Keyframe], t: f32) -> f32 {
    let (first, last) = match (keys.first(), keys.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return 0.0,
    };
    if t <= first.time {
        return first.value;
    }
    if t >= last.time {
        return last.value;
    }

    // keys are sorted, so the first key past `t` closes the segment
    let upper = keys.partition_point(|k| k.time <= t);
    let k0 = &keys[upper - 1];
    let k1 = &keys[upper];

    let span = k1.time - k0.time;
    let s = (t - k0.time) / span;
    let s2 = s * s;
    let s3 = s2 * s;

    let h00 = 2.0 * s3 - 3.0 * s2 + 1.0;
    let h10 = s3 - 2.0 * s2 + s;
    let h01 = -2.0 * s3 + 3.0 * s2;
    let h11 = s3 - s2;

    h00 * k0.value + h10 * span * k0.out_tangent + h01 * k1.value + h11 * span * k1.in_tangent
}
