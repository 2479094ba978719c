// Per-axis linear velocity damping

use crate::{
    body::{Basis, ForceMode, RigidBody, Space, project},
    error::{Result, check_non_negative},
};
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrictionParams {
    pub forward: f32,
    pub up: f32,
    pub right: f32,
    pub space: Space,
}

impl Default for FrictionParams {
    fn default() -> Self {
        Self::uniform(1.0, Space::World)
    }
}

impl FrictionParams {
    pub fn uniform(friction: f32, space: Space) -> Self {
        Self {
            forward: friction,
            up: friction,
            right: friction,
            space,
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_non_negative("friction.forward", self.forward)?;
        check_non_negative("friction.up", self.up)?;
        check_non_negative("friction.right", self.right)
    }
}

/// Opposes linear velocity along three axes, each with its own strength.
#[derive(Debug, Clone)]
pub struct AxisFriction {
    params: FrictionParams,
}

impl AxisFriction {
    pub fn new(params: FrictionParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &FrictionParams {
        &self.params
    }

    pub fn set_params(&mut self, params: FrictionParams) {
        self.params = params;
    }

    pub fn update<B: RigidBody + ?Sized>(&mut self, body: &mut B, _dt: f32) {
        let basis = match self.params.space {
            Space::Local => body.basis(),
            Space::World => Basis::from_rotation(Quat::IDENTITY),
        };

        apply_axis(body, basis.forward, self.params.forward);
        apply_axis(body, basis.up, self.params.up);
        apply_axis(body, basis.right, self.params.right);
    }
}

fn apply_axis<B: RigidBody + ?Sized>(body: &mut B, axis: Vec3, friction: f32) {
    if friction < f32::EPSILON {
        return;
    }
    let velocity = project(body.linear_velocity(), axis);
    body.apply_force(-velocity * friction, ForceMode::Acceleration);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimBody;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn world_friction_per_axis() {
        let mut body = SimBody::default().with_velocity(Vec3::new(1.0, 2.0, 3.0), Vec3::ZERO);
        let mut friction = AxisFriction::new(FrictionParams {
            forward: 1.0,
            up: 0.5,
            right: 0.0,
            space: Space::World,
        });
        friction.update(&mut body, 0.02);
        assert!(body.pending_force().abs_diff_eq(Vec3::new(0.0, -1.0, -3.0), 1e-6));
    }

    #[test]
    fn local_friction_follows_the_body() {
        // forward now points along world +X
        let mut body = SimBody::new(Vec3::ZERO, Quat::from_rotation_y(FRAC_PI_2))
            .with_velocity(Vec3::new(2.0, 0.0, 0.0), Vec3::ZERO);
        let mut friction = AxisFriction::new(FrictionParams {
            forward: 1.0,
            up: 0.0,
            right: 0.0,
            space: Space::Local,
        });
        friction.update(&mut body, 0.02);
        assert!(body.pending_force().abs_diff_eq(Vec3::new(-2.0, 0.0, 0.0), 1e-5));
    }

    #[test]
    fn negative_friction_is_rejected() {
        let params = FrictionParams {
            up: -1.0,
            ..FrictionParams::default()
        };
        assert!(params.validate().is_err());
    }
}
