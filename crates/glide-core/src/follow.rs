//! Distance-based attraction toward a moving target point.

use crate::{
    body::{ForceMode, RigidBody, Space, normalize_or_zero},
    error::{Result, check_non_negative},
    friction::{AxisFriction, FrictionParams},
};
use glam::Vec3;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FollowParams {
    /// Attraction per squared unit of distance
    pub move_factor: f32,
    /// Distance past which the extra keep force kicks in
    pub keep_distance: f32,
    pub keep_force: f32,
    /// World-space friction on all three axes
    pub damp: f32,
}

impl Default for FollowParams {
    fn default() -> Self {
        Self {
            move_factor: 5.0,
            keep_distance: 2.0,
            keep_force: 15.0,
            damp: 10.0,
        }
    }
}

impl FollowParams {
    pub fn validate(&self) -> Result<()> {
        check_non_negative("follow.move_factor", self.move_factor)?;
        check_non_negative("follow.keep_distance", self.keep_distance)?;
        check_non_negative("follow.keep_force", self.keep_force)?;
        check_non_negative("follow.damp", self.damp)
    }

    fn friction(&self) -> FrictionParams {
        FrictionParams::uniform(self.damp, Space::World)
    }
}

/// Pulls a body toward `target` with a force growing with the squared
/// distance, plus a stronger pull once it drifts past `keep_distance`.
#[derive(Debug, Clone)]
pub struct Follow {
    params: FollowParams,
    target: Vec3,
    friction: AxisFriction,
}

impl Follow {
    pub fn new(params: FollowParams, target: Vec3) -> Self {
        Self {
            friction: AxisFriction::new(params.friction()),
            params,
            target,
        }
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
    }

    pub fn params(&self) -> &FollowParams {
        &self.params
    }

    pub fn set_params(&mut self, params: FollowParams) {
        self.friction.set_params(params.friction());
        self.params = params;
    }

    pub fn set_move_factor(&mut self, move_factor: f32) {
        self.params.move_factor = move_factor;
    }

    pub fn update<B: RigidBody + ?Sized>(&mut self, body: &mut B, dt: f32) {
        let to_target = self.target - body.position();
        let distance = to_target.length();
        let direction = normalize_or_zero(to_target);

        body.apply_force(
            direction * (distance * distance * self.params.move_factor),
            ForceMode::Acceleration,
        );

        if distance > self.params.keep_distance {
            let excess = distance - self.params.keep_distance;
            body.apply_force(
                direction * (excess * excess * self.params.keep_force),
                ForceMode::Acceleration,
            );
        }

        self.friction.update(body, dt);
    }
}
