// Approximate inverse of a normalized curve by uniform sampling

use crate::{
    curve::Curve,
    error::{ParamsError, Result, check_positive},
};
use serde::{Deserialize, Serialize};

const DEFAULT_ACCURACY_DROP: f32 = 0.005;
const DEFAULT_FREQUENCY: u32 = 100;

/// Sampling settings for [`find_time`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    /// A sample closer than this to the target is accepted immediately
    pub accuracy_drop: f32,
    /// Number of equally spaced samples over `[0, 1)`
    pub frequency: u32,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            accuracy_drop: DEFAULT_ACCURACY_DROP,
            frequency: DEFAULT_FREQUENCY,
        }
    }
}

impl SolverSettings {
    pub fn validate(&self) -> Result<()> {
        check_positive("solver.accuracy_drop", self.accuracy_drop)?;
        if self.frequency == 0 {
            return Err(ParamsError::ZeroFrequency);
        }
        Ok(())
    }
}

/// Find the normalized time at which `curve` produces `target`.
///
/// Samples `i / frequency` for `i in 0..frequency` in increasing order and
/// returns the first sample within `accuracy_drop` of the target. When no
/// sample qualifies the closest one wins, so a target outside the curve's
/// range resolves to the extremal sample. The result is an approximation;
/// callers have to tolerate an error of about one sample step.
pub fn find_time<C: Curve + ?Sized>(curve: &C, target: f32, settings: &SolverSettings) -> f32 {
    if settings.frequency == 0 {
        return 0.0;
    }

    let step = 1.0 / settings.frequency as f32;
    let mut best_diff = f32::INFINITY;
    let mut best_time = 0.0;

    for i in 0..settings.frequency {
        let time = step * i as f32;
        let diff = (curve.evaluate(time) - target).abs();

        if diff < settings.accuracy_drop {
            return time;
        }

        if diff < best_diff {
            best_diff = diff;
            best_time = time;
        }
    }

    best_time
}
