// Three axis drivers bound to a body's right, up and forward axes

use crate::{
    axis_driver::{AxisDriver, AxisDriverParams},
    body::RigidBody,
    curve_solver::SolverSettings,
    error::Result,
};
use glam::Vec3;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotatorParams {
    pub right: AxisDriverParams,
    pub up: AxisDriverParams,
    pub forward: AxisDriverParams,
}

impl RotatorParams {
    pub fn validate(&self) -> Result<()> {
        self.right.validate()?;
        self.up.validate()?;
        self.forward.validate()
    }
}

/// Per-axis inputs in `[-1, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotatorInputs {
    pub right: f32,
    pub up: f32,
    pub forward: f32,
}

/// Pitch, yaw and roll drivers. Each driver's axis direction is pinned to
/// `+X`, `+Y` and `+Z` respectively; only the configured space is kept.
#[derive(Debug, Clone)]
pub struct ThreeAxisRotator {
    right: AxisDriver,
    up: AxisDriver,
    forward: AxisDriver,
}

impl ThreeAxisRotator {
    pub fn new(params: RotatorParams) -> Self {
        let [right, up, forward] = pin_axes(params);
        Self {
            right: AxisDriver::new(right),
            up: AxisDriver::new(up),
            forward: AxisDriver::new(forward),
        }
    }

    pub fn with_settings(params: RotatorParams, solver: SolverSettings, accuracy: f32) -> Self {
        let [right, up, forward] = pin_axes(params);
        Self {
            right: AxisDriver::with_settings(right, solver, accuracy),
            up: AxisDriver::with_settings(up, solver, accuracy),
            forward: AxisDriver::with_settings(forward, solver, accuracy),
        }
    }

    pub fn right(&self) -> &AxisDriver {
        &self.right
    }

    pub fn up(&self) -> &AxisDriver {
        &self.up
    }

    pub fn forward(&self) -> &AxisDriver {
        &self.forward
    }

    pub fn rotate<B: RigidBody + ?Sized>(&mut self, body: &mut B, dt: f32, inputs: RotatorInputs) {
        self.right.drive(body, inputs.right, dt);
        self.up.drive(body, inputs.up, dt);
        self.forward.drive(body, inputs.forward, dt);
    }

    pub fn set_params(&mut self, params: RotatorParams) {
        let [right, up, forward] = pin_axes(params);
        self.right.set_params(right);
        self.up.set_params(up);
        self.forward.set_params(forward);
    }
}

fn pin_axes(params: RotatorParams) -> [AxisDriverParams; 3] {
    let RotatorParams { right, up, forward } = params;
    [(right, Vec3::X), (up, Vec3::Y), (forward, Vec3::Z)].map(|(mut params, direction)| {
        params.axis = params.axis.with_direction(direction);
        params
    })
}
