//! Single-axis rotation driver.
//!
//! An [`AxisDriver`] turns a signed input in `[-1, 1]` into torque about one
//! axis. The magnitude of the input is fed to a [`SmartAcceleration`] as its
//! target, so the reachable angular speed ramps up and decays along the
//! configured curves. Flipping the input sign restarts the ramp from rest.

use crate::{
    body::{Basis, ForceMode, RigidBody, project, sign},
    curve_solver::SolverSettings,
    error::{Result, check_non_negative},
    smart_acceleration::{AccelerationParams, SmartAcceleration},
};
use glam::Vec3;
use serde::{Deserialize, Serialize};

const DEFAULT_FORCE: f32 = 3.0;

/// Where the driven axis comes from. The vector is expected to be unit
/// length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisSource {
    /// Fixed world-space axis.
    World(Vec3),
    /// Local axis (`x` right, `y` up, `z` forward) following the body.
    Local(Vec3),
}

impl AxisSource {
    pub fn resolve(&self, basis: &Basis) -> Vec3 {
        match self {
            AxisSource::World(axis) => *axis,
            AxisSource::Local(axis) => basis.transform(*axis),
        }
    }

    pub fn direction(&self) -> Vec3 {
        match self {
            AxisSource::World(axis) | AxisSource::Local(axis) => *axis,
        }
    }

    /// Same space, different direction.
    pub fn with_direction(self, direction: Vec3) -> Self {
        match self {
            AxisSource::World(_) => AxisSource::World(direction),
            AxisSource::Local(_) => AxisSource::Local(direction),
        }
    }
}

impl Default for AxisSource {
    fn default() -> Self {
        AxisSource::World(Vec3::Y)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrivePolicy {
    /// Mass-independent torque scaled by the clear value, applied only
    /// while below the target speed or while reversing.
    #[default]
    ByForce,
    /// Velocity change that snaps the axis speed onto the controller value.
    Absolute,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisDriverParams {
    pub acceleration: AccelerationParams,
    pub force: f32,
    pub axis: AxisSource,
    pub policy: DrivePolicy,
}

impl Default for AxisDriverParams {
    fn default() -> Self {
        Self {
            acceleration: AccelerationParams::default(),
            force: DEFAULT_FORCE,
            axis: AxisSource::default(),
            policy: DrivePolicy::default(),
        }
    }
}

impl AxisDriverParams {
    pub fn validate(&self) -> Result<()> {
        check_non_negative("force", self.force)?;
        self.acceleration.validate()
    }
}

#[derive(Debug, Clone)]
pub struct AxisDriver {
    params: AxisDriverParams,
    acceleration: SmartAcceleration,
    last_input: f32,
}

impl AxisDriver {
    pub fn new(params: AxisDriverParams) -> Self {
        let acceleration = SmartAcceleration::new(params.acceleration.clone());
        Self::from_parts(params, acceleration)
    }

    pub fn with_settings(params: AxisDriverParams, solver: SolverSettings, accuracy: f32) -> Self {
        let acceleration =
            SmartAcceleration::with_settings(params.acceleration.clone(), solver, accuracy);
        Self::from_parts(params, acceleration)
    }

    fn from_parts(params: AxisDriverParams, mut acceleration: SmartAcceleration) -> Self {
        acceleration.to_end();
        Self {
            params,
            acceleration,
            last_input: 0.0,
        }
    }

    pub fn params(&self) -> &AxisDriverParams {
        &self.params
    }

    pub fn acceleration(&self) -> &SmartAcceleration {
        &self.acceleration
    }

    pub fn last_input(&self) -> f32 {
        self.last_input
    }

    pub fn set_params(&mut self, params: AxisDriverParams) {
        self.acceleration.set_params(params.acceleration.clone());
        self.params = params;
    }

    /// Run one tick: advance the controller with `input` and apply the
    /// resulting torque to `body`.
    pub fn drive<B: RigidBody + ?Sized>(&mut self, body: &mut B, input: f32, dt: f32) {
        self.feed(input, dt);
        self.apply(body, sign(input));
    }

    /// Controller half of [`AxisDriver::drive`]; no torque is applied.
    pub fn feed(&mut self, input: f32, dt: f32) {
        self.reset_on_reversal(input);

        self.acceleration.set_target_clear_value(input.abs());
        self.acceleration.update(dt);

        self.last_input = input;
    }

    /// Restart the ramp from the inertia rest position when the sign of
    /// `input` differs from the previous input. Returns whether it did.
    pub fn reset_on_reversal(&mut self, input: f32) -> bool {
        if sign(input) == sign(self.last_input) {
            return false;
        }

        tracing::trace!(input, last_input = self.last_input, "input reversed");
        self.acceleration.to_end();
        true
    }

    fn apply<B: RigidBody + ?Sized>(&self, body: &mut B, input_sign: f32) {
        let value = self.acceleration.value();
        if value < f32::EPSILON {
            return;
        }

        let axis = self.params.axis.resolve(&body.basis());
        let projected = project(body.angular_velocity(), axis);
        let velocity_sign = sign(projected.dot(axis));
        let magnitude = projected.length();
        let reversing = input_sign != velocity_sign && magnitude > f32::EPSILON;

        match self.params.policy {
            DrivePolicy::ByForce => {
                if reversing || magnitude < value {
                    let force = input_sign * self.params.force * self.acceleration.clear_value();
                    body.apply_torque(axis * force, ForceMode::Acceleration);
                }
            }
            DrivePolicy::Absolute => {
                let reverse_factor = if reversing { -1.0 } else { 1.0 };
                let diff = value - magnitude * reverse_factor;
                body.apply_torque(axis * (diff * input_sign), ForceMode::VelocityChange);
            }
        }
    }
}
