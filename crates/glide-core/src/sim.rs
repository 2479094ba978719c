//! Reference integrator.
//!
//! [`SimBody`] is a minimal semi-implicit Euler body implementing
//! [`RigidBody`]. It exists so the controllers can be exercised without a
//! host engine: tests and the scenario runner drive it directly.

use crate::body::{ForceMode, RigidBody};
use glam::{Quat, Vec3};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Accumulator {
    acceleration: Vec3,
    velocity_change: Vec3,
}

impl Accumulator {
    fn add(&mut self, v: Vec3, mode: ForceMode) {
        match mode {
            ForceMode::Acceleration => self.acceleration += v,
            ForceMode::VelocityChange => self.velocity_change += v,
        }
    }

    fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}

#[derive(Debug, Clone)]
pub struct SimBody {
    position: Vec3,
    rotation: Quat,
    linear_velocity: Vec3,
    angular_velocity: Vec3,
    max_angular_speed: Option<f32>,
    force: Accumulator,
    torque: Accumulator,
}

impl Default for SimBody {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Quat::IDENTITY)
    }
}

impl SimBody {
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation: rotation.normalize(),
            linear_velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            max_angular_speed: None,
            force: Accumulator::default(),
            torque: Accumulator::default(),
        }
    }

    pub fn with_velocity(mut self, linear: Vec3, angular: Vec3) -> Self {
        self.linear_velocity = linear;
        self.angular_velocity = angular;
        self
    }

    /// Clamp the angular speed after every step.
    pub fn with_max_angular_speed(mut self, max: f32) -> Self {
        self.max_angular_speed = Some(max);
        self
    }

    /// Move the body without integrating; pending contributions are kept.
    pub fn teleport(&mut self, position: Vec3, rotation: Quat) {
        self.position = position;
        self.rotation = rotation.normalize();
    }

    pub fn set_angular_velocity(&mut self, angular_velocity: Vec3) {
        self.angular_velocity = angular_velocity;
    }

    pub fn set_linear_velocity(&mut self, linear_velocity: Vec3) {
        self.linear_velocity = linear_velocity;
    }

    /// Torque accumulated in acceleration mode since the last step.
    pub fn pending_torque(&self) -> Vec3 {
        self.torque.acceleration
    }

    /// Torque accumulated in velocity-change mode since the last step.
    pub fn pending_angular_velocity_change(&self) -> Vec3 {
        self.torque.velocity_change
    }

    pub fn pending_force(&self) -> Vec3 {
        self.force.acceleration
    }

    /// Integrate all pending contributions over `dt` and clear them.
    pub fn step(&mut self, dt: f32) {
        let force = self.force.take();
        let torque = self.torque.take();

        self.linear_velocity += force.acceleration * dt + force.velocity_change;
        self.angular_velocity += torque.acceleration * dt + torque.velocity_change;

        if let Some(max) = self.max_angular_speed {
            self.angular_velocity = self.angular_velocity.clamp_length_max(max);
        }

        self.position += self.linear_velocity * dt;
        let delta = Quat::from_scaled_axis(self.angular_velocity * dt);
        self.rotation = (delta * self.rotation).normalize();
    }
}

impl RigidBody for SimBody {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn linear_velocity(&self) -> Vec3 {
        self.linear_velocity
    }

    fn angular_velocity(&self) -> Vec3 {
        self.angular_velocity
    }

    fn rotation(&self) -> Quat {
        self.rotation
    }

    fn apply_force(&mut self, force: Vec3, mode: ForceMode) {
        self.force.add(force, mode);
    }

    fn apply_torque(&mut self, torque: Vec3, mode: ForceMode) {
        self.torque.add(torque, mode);
    }
}
