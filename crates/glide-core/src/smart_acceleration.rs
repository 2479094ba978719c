//! Curve-driven scalar motion controller.
//!
//! [`SmartAcceleration`] turns a dimensionless request into a bounded,
//! time-shaped output. It walks along one of two curves: the acceleration
//! curve while the value grows and the inertia curve while it decays. Every
//! curve swap re-anchors the walk time with [`find_time`] so the output
//! never jumps; only [`SmartAcceleration::update`] moves it forward.

use crate::{
    curve::{Curve, CurveShape},
    curve_solver::{SolverSettings, find_time},
    error::{Result, check_finite, check_positive},
};
use serde::{Deserialize, Serialize};

const DEFAULT_ACCURACY: f32 = 0.02;

/// Which curve currently maps time onto value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Acceleration,
    Inertia,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Time advances along the active phase regardless of any target.
    #[default]
    Stadia,
    /// The clear value is steered toward [`SmartAcceleration::target_clear_value`].
    TargetSeek,
}

/// A curve together with how long it takes to walk it end to end.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseCurve {
    /// Seconds from t=0 to t=1
    pub time_to_max: f32,
    pub curve: CurveShape,
}

impl PhaseCurve {
    pub fn new(time_to_max: f32, curve: CurveShape) -> Self {
        Self { time_to_max, curve }
    }

    fn validate(&self, field: &'static str) -> Result<()> {
        check_positive(field, self.time_to_max)?;
        self.curve.validate()
    }
}

impl Default for PhaseCurve {
    fn default() -> Self {
        Self::new(1.0, CurveShape::rising())
    }
}

/// Parameters of a [`SmartAcceleration`].
///
/// The public value is `clear_value * multiply + added_value`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "AccelerationParamsDef")]
pub struct AccelerationParams {
    pub multiply: f32,
    pub added_value: f32,
    pub acceleration: PhaseCurve,
    /// Walked from high to low values
    pub inertia: PhaseCurve,
}

impl Default for AccelerationParams {
    fn default() -> Self {
        Self {
            multiply: 1.0,
            added_value: 0.0,
            acceleration: PhaseCurve::new(1.0, CurveShape::rising()),
            inertia: PhaseCurve::new(1.0, CurveShape::falling()),
        }
    }
}

/// Serialized form of [`AccelerationParams`]. A phase that leaves out its
/// duration or shape falls back to that phase's own default, so a partial
/// `inertia` table still falls.
#[derive(Deserialize)]
#[serde(default)]
struct AccelerationParamsDef {
    multiply: f32,
    added_value: f32,
    acceleration: PhaseCurveDef,
    inertia: PhaseCurveDef,
}

impl Default for AccelerationParamsDef {
    fn default() -> Self {
        Self {
            multiply: 1.0,
            added_value: 0.0,
            acceleration: PhaseCurveDef::default(),
            inertia: PhaseCurveDef::default(),
        }
    }
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct PhaseCurveDef {
    time_to_max: Option<f32>,
    curve: Option<CurveShape>,
}

impl PhaseCurveDef {
    fn or(self, fallback: PhaseCurve) -> PhaseCurve {
        PhaseCurve {
            time_to_max: self.time_to_max.unwrap_or(fallback.time_to_max),
            curve: self.curve.unwrap_or(fallback.curve),
        }
    }
}

impl From<AccelerationParamsDef> for AccelerationParams {
    fn from(def: AccelerationParamsDef) -> Self {
        let defaults = AccelerationParams::default();
        Self {
            multiply: def.multiply,
            added_value: def.added_value,
            acceleration: def.acceleration.or(defaults.acceleration),
            inertia: def.inertia.or(defaults.inertia),
        }
    }
}

impl AccelerationParams {
    pub fn curve(&self, phase: Phase) -> &PhaseCurve {
        match phase {
            Phase::Acceleration => &self.acceleration,
            Phase::Inertia => &self.inertia,
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_finite("multiply", self.multiply)?;
        check_finite("added_value", self.added_value)?;
        self.acceleration.validate("acceleration.time_to_max")?;
        self.inertia.validate("inertia.time_to_max")
    }
}

/// Read-only snapshot for inspection tooling.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DebugView {
    pub value: f32,
    pub time: f32,
}

#[derive(Clone, Debug)]
pub struct SmartAcceleration {
    params: AccelerationParams,
    solver: SolverSettings,
    accuracy: f32,
    phase: Phase,
    mode: Mode,
    time: f32,
    clear_value: f32,
    target_clear_value: f32,
}

impl SmartAcceleration {
    pub fn new(params: AccelerationParams) -> Self {
        Self::with_settings(params, SolverSettings::default(), DEFAULT_ACCURACY)
    }

    /// `accuracy` is the distance at which target seeking considers the
    /// target reached. Keep it a few times larger than
    /// `solver.accuracy_drop`, otherwise re-anchoring noise can keep the
    /// seek step alive around the target.
    pub fn with_settings(params: AccelerationParams, solver: SolverSettings, accuracy: f32) -> Self {
        let mut acceleration = Self {
            params,
            solver,
            accuracy,
            phase: Phase::Acceleration,
            mode: Mode::Stadia,
            time: 0.0,
            clear_value: 0.0,
            target_clear_value: 0.0,
        };
        acceleration.to_start();
        acceleration
    }

    /// Shaped output: `clear_value * multiply + added_value`.
    pub fn value(&self) -> f32 {
        self.clear_value * self.params.multiply + self.params.added_value
    }

    pub fn clear_value(&self) -> f32 {
        self.clear_value
    }

    /// Normalized position on the active curve.
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn target_clear_value(&self) -> f32 {
        self.target_clear_value
    }

    pub fn accuracy(&self) -> f32 {
        self.accuracy
    }

    pub fn params(&self) -> &AccelerationParams {
        &self.params
    }

    pub fn debug_view(&self) -> DebugView {
        DebugView {
            value: self.value(),
            time: self.time,
        }
    }

    /// Advance by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        match self.mode {
            Mode::TargetSeek => {
                if (self.target_clear_value - self.clear_value).abs() > self.accuracy {
                    self.seek(dt);
                }
            }
            Mode::Stadia => self.advance(dt),
        }
    }

    /// Steer the clear value toward `value`.
    ///
    /// Targets at 0 or 1 do not seek: they switch to stadia mode on the
    /// inertia or acceleration phase respectively, which ends at the same
    /// place without the per-tick comparison. Such targets are not recorded
    /// in [`Self::target_clear_value`].
    pub fn set_target_clear_value(&mut self, value: f32) {
        let at_max = (value - 1.0).abs() < f32::EPSILON;
        let at_min = value.abs() < f32::EPSILON;
        if at_max || at_min {
            let phase = if at_max {
                Phase::Acceleration
            } else {
                Phase::Inertia
            };
            self.set_phase(phase);
            return;
        }

        self.target_clear_value = value;
        self.mode = Mode::TargetSeek;
    }

    /// Switch to stadia mode on `phase`.
    pub fn set_phase(&mut self, phase: Phase) {
        self.mode = Mode::Stadia;
        self.switch_phase(phase);
    }

    /// Swap the active curve without touching the mode. The clear value is
    /// kept and the time re-anchored on the new curve.
    pub fn switch_phase(&mut self, phase: Phase) {
        if phase == self.phase {
            return;
        }

        self.phase = phase;
        self.time = self.find_time(self.clear_value);
        tracing::trace!(?phase, time = self.time, clear_value = self.clear_value, "phase switch");
    }

    /// Rest position at the bottom of the acceleration curve.
    pub fn to_start(&mut self) -> &mut Self {
        self.set_position(Phase::Acceleration, 0.0)
    }

    /// Rest position at the end of the inertia curve.
    pub fn to_end(&mut self) -> &mut Self {
        self.set_position(Phase::Inertia, 1.0)
    }

    /// Hot-swap parameters while preserving the public value.
    ///
    /// The clear value is solved from the new affine transform and clamped
    /// to `[0, 1]`; a value the new transform cannot represent is the only
    /// case in which the output moves. A zero `multiply` keeps the clear
    /// value as is.
    pub fn set_params(&mut self, params: AccelerationParams) {
        let value = self.value();
        let clear_value = if params.multiply == 0.0 {
            self.clear_value
        } else {
            ((value - params.added_value) / params.multiply).clamp(0.0, 1.0)
        };

        self.params = params;
        self.clear_value = clear_value;
        self.time = self.find_time(clear_value);
        tracing::debug!(value, clear_value, time = self.time, "acceleration params swapped");
    }

    fn seek(&mut self, dt: f32) {
        let old_clear_value = self.clear_value;
        let target = self.target_clear_value;

        let phase = if old_clear_value < target {
            Phase::Acceleration
        } else {
            Phase::Inertia
        };
        self.switch_phase(phase);
        self.advance(dt);

        let overstepped = (old_clear_value - target).abs() < (old_clear_value - self.clear_value).abs();
        if overstepped {
            self.clear_value = target;
            self.time = self.find_time(target);
        }
    }

    fn advance(&mut self, dt: f32) {
        let curve = self.params.curve(self.phase);
        self.time = (self.time + dt / curve.time_to_max).clamp(0.0, 1.0);
        self.clear_value = curve.curve.evaluate(self.time);
    }

    fn set_position(&mut self, phase: Phase, time: f32) -> &mut Self {
        self.phase = phase;
        self.time = time;
        self.clear_value = self.params.curve(phase).curve.evaluate(time);
        self
    }

    fn find_time(&self, clear_value: f32) -> f32 {
        find_time(&self.params.curve(self.phase).curve, clear_value, &self.solver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParamsError;

    fn linear() -> SmartAcceleration {
        SmartAcceleration::new(AccelerationParams::default())
    }

    #[test]
    fn starts_at_rest() {
        let acc = linear();
        assert_eq!(acc.phase(), Phase::Acceleration);
        assert_eq!(acc.mode(), Mode::Stadia);
        assert_eq!(acc.time(), 0.0);
        assert_eq!(acc.clear_value(), 0.0);
        assert_eq!(acc.value(), 0.0);
    }

    #[test]
    fn full_target_walks_the_acceleration_curve() {
        let mut acc = linear();
        acc.to_start();
        acc.set_target_clear_value(1.0);

        acc.update(0.5);
        assert_eq!(acc.clear_value(), 0.5);
        assert_eq!(acc.phase(), Phase::Acceleration);

        acc.update(0.5);
        assert_eq!(acc.clear_value(), 1.0);
        assert_eq!(acc.phase(), Phase::Acceleration);
        // the edge target is handled in stadia mode
        assert_eq!(acc.mode(), Mode::Stadia);

        acc.update(0.5);
        assert_eq!(acc.clear_value(), 1.0);
    }

    #[test]
    fn seek_clamps_exactly_on_overstep() {
        let mut acc = linear();
        acc.set_target_clear_value(0.75);
        assert_eq!(acc.mode(), Mode::TargetSeek);

        acc.update(0.5);
        assert_eq!(acc.clear_value(), 0.5);

        acc.update(0.5);
        assert_eq!(acc.clear_value(), 0.75);
        assert!((acc.time() - 0.75).abs() < 0.01);

        acc.update(0.5);
        assert_eq!(acc.clear_value(), 0.75);
        assert_eq!(acc.mode(), Mode::TargetSeek);
    }

    #[test]
    fn seek_descends_on_the_inertia_curve() {
        let mut acc = linear();
        acc.set_phase(Phase::Acceleration);
        acc.update(1.0);
        assert_eq!(acc.clear_value(), 1.0);

        acc.set_target_clear_value(0.3);
        acc.update(0.25);
        assert_eq!(acc.phase(), Phase::Inertia);
        assert!((acc.clear_value() - 0.75).abs() < 0.011, "{}", acc.clear_value());

        for _ in 0..10 {
            acc.update(0.25);
        }
        assert_eq!(acc.clear_value(), 0.3);
    }

    #[test]
    fn zero_target_decays_in_stadia_mode() {
        let mut acc = linear();
        acc.set_target_clear_value(0.5);
        acc.update(0.5);
        acc.set_target_clear_value(0.0);
        assert_eq!(acc.mode(), Mode::Stadia);
        assert_eq!(acc.phase(), Phase::Inertia);
        // edge targets are not recorded as seek targets
        assert_eq!(acc.target_clear_value(), 0.5);
        for _ in 0..6 {
            acc.update(0.25);
        }
        assert_eq!(acc.clear_value(), 0.0);
    }

    #[test]
    fn rest_positions_are_idempotent() {
        let mut acc = linear();
        acc.set_target_clear_value(0.4);
        acc.update(0.3);

        acc.to_end();
        assert_eq!(acc.phase(), Phase::Inertia);
        assert_eq!(acc.time(), 1.0);
        assert_eq!(acc.clear_value(), CurveShape::falling().evaluate(1.0));
        acc.to_end();
        assert_eq!(acc.time(), 1.0);

        acc.to_start();
        assert_eq!(acc.phase(), Phase::Acceleration);
        assert_eq!(acc.time(), 0.0);
        assert_eq!(acc.clear_value(), 0.0);
        acc.to_start().to_start();
        assert_eq!(acc.clear_value(), 0.0);
    }

    #[test]
    fn phase_swap_keeps_value() {
        let mut acc = linear();
        acc.set_phase(Phase::Acceleration);
        acc.update(0.37);
        let before = acc.value();

        acc.set_phase(Phase::Inertia);
        assert_eq!(acc.value(), before);
        assert!((acc.time() - 0.63).abs() < 0.01, "{}", acc.time());

        acc.update(0.0);
        assert!((acc.value() - before).abs() < 0.006);
    }

    #[test]
    fn params_swap_keeps_value() {
        let mut acc = linear();
        acc.set_target_clear_value(0.6);
        for _ in 0..10 {
            acc.update(0.25);
        }
        assert_eq!(acc.value(), 0.6);

        let params = AccelerationParams {
            multiply: 2.0,
            added_value: 0.5,
            ..AccelerationParams::default()
        };
        acc.set_params(params);
        assert!((acc.value() - 0.6).abs() < 1e-6);
        assert!((acc.clear_value() - 0.05).abs() < 1e-6);
        assert_eq!(acc.params().multiply, 2.0);
    }

    #[test]
    fn params_swap_with_zero_multiply_keeps_clear_value() {
        let mut acc = linear();
        acc.set_phase(Phase::Acceleration);
        acc.update(0.5);
        acc.set_params(AccelerationParams {
            multiply: 0.0,
            added_value: 3.0,
            ..AccelerationParams::default()
        });
        assert_eq!(acc.clear_value(), 0.5);
        assert_eq!(acc.value(), 3.0);
    }

    #[test]
    fn large_accuracy_stops_short_and_stays_put() {
        let mut acc =
            SmartAcceleration::with_settings(AccelerationParams::default(), SolverSettings::default(), 0.1);
        acc.set_target_clear_value(0.55);
        for _ in 0..100 {
            acc.update(0.01);
        }
        let settled = acc.clear_value();
        assert!((settled - 0.55).abs() <= 0.1 + 1e-6, "{settled}");
        assert!(settled <= 0.55);

        acc.update(0.01);
        assert_eq!(acc.clear_value(), settled);
    }

    #[test]
    fn debug_view_reports_value_and_time() {
        let mut acc = SmartAcceleration::new(AccelerationParams {
            multiply: 4.0,
            ..AccelerationParams::default()
        });
        acc.set_phase(Phase::Acceleration);
        acc.update(0.25);
        assert_eq!(
            acc.debug_view(),
            DebugView {
                value: 1.0,
                time: 0.25
            }
        );
    }

    #[test]
    fn validate_rejects_zero_time_to_max() {
        let mut params = AccelerationParams::default();
        assert!(params.validate().is_ok());
        params.inertia.time_to_max = 0.0;
        assert_eq!(
            params.validate(),
            Err(ParamsError::NotPositive {
                field: "inertia.time_to_max",
                value: 0.0
            })
        );
    }

    #[test]
    fn seeking_converges_without_overshoot() {
        bolero::check!()
            .with_type::<(u8, u8)>()
            .for_each(|(target, dt)| {
                let target = 0.05 + 0.9 * *target as f32 / 255.0;
                let dt = 0.005 + 0.1 * *dt as f32 / 255.0;

                let mut acc = linear();
                acc.set_target_clear_value(target);

                let mut ticks = 0;
                while (acc.clear_value() - target).abs() > acc.accuracy() {
                    acc.update(dt);
                    assert!(acc.clear_value() <= target, "overshoot {}", acc.clear_value());
                    ticks += 1;
                    assert!(ticks < 1_000, "no convergence to {target} with dt {dt}");
                }

                let settled = acc.clear_value();
                acc.update(dt);
                assert_eq!(acc.clear_value(), settled);
            });
    }

    #[test]
    fn swaps_never_jump() {
        let params_a = AccelerationParams {
            multiply: 2.0,
            ..AccelerationParams::default()
        };
        let params_b = AccelerationParams {
            multiply: 2.0,
            added_value: 0.0,
            acceleration: PhaseCurve::new(0.5, CurveShape::ease_in_out()),
            inertia: PhaseCurve::new(0.5, CurveShape::falling()),
        };

        bolero::check!()
            .with_type::<Vec<(u8, u8)>>()
            .for_each(|ops| {
                let mut acc = SmartAcceleration::new(params_a.clone());
                let mut use_b = false;

                for (op, arg) in ops {
                    let arg = *arg as f32 / 255.0;
                    let before = acc.value();

                    match op % 5 {
                        0 => {
                            acc.set_phase(if arg < 0.5 {
                                Phase::Acceleration
                            } else {
                                Phase::Inertia
                            });
                            assert_eq!(acc.value(), before);
                        }
                        1 => {
                            acc.set_target_clear_value(arg);
                            assert_eq!(acc.value(), before);
                        }
                        2 => {
                            use_b = !use_b;
                            let params = if use_b { &params_b } else { &params_a };
                            acc.set_params(params.clone());
                            assert!((acc.value() - before).abs() < 1e-5);
                        }
                        3 => {
                            acc.update(0.0);
                            // only re-anchoring error can show up
                            assert!((acc.value() - before).abs() <= 2.0 * 0.012);
                        }
                        _ => {
                            let dt = 0.1 * arg;
                            acc.update(dt);
                            let bound = 2.0 * (1.5 * dt / 0.5 + 0.012) + 1e-5;
                            assert!((acc.value() - before).abs() <= bound);
                        }
                    }
                }
            });
    }
}
