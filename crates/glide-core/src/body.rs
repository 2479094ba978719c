// Rigid-body collaborator contract and the vector helpers shared by the
// controllers

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

// Below this length a vector is treated as zero when normalizing
const NORMALIZE_EPSILON: f32 = 1e-5;

/// How a force or torque contribution is interpreted by the integrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForceMode {
    /// Treated as an acceleration; the body's mass is ignored.
    Acceleration,
    /// Added to the velocity directly.
    VelocityChange,
}

/// Coordinate space of a configured axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Space {
    #[default]
    World,
    /// Relative to the body's current orientation.
    Local,
}

/// The body's local axes expressed in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Basis {
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

impl Basis {
    pub fn from_rotation(rotation: Quat) -> Self {
        Self {
            forward: rotation * Vec3::Z,
            right: rotation * Vec3::X,
            up: rotation * Vec3::Y,
        }
    }

    /// Map a local axis (`x` right, `y` up, `z` forward) to world space.
    pub fn transform(&self, local: Vec3) -> Vec3 {
        self.forward * local.z + self.right * local.x + self.up * local.y
    }
}

/// The integrator-owned body the controllers act on.
///
/// Contributions are accumulated until the host integrates; they are
/// additive and their order within a tick does not matter.
pub trait RigidBody {
    fn position(&self) -> Vec3;
    fn linear_velocity(&self) -> Vec3;
    fn angular_velocity(&self) -> Vec3;
    fn rotation(&self) -> Quat;
    fn apply_force(&mut self, force: Vec3, mode: ForceMode);
    fn apply_torque(&mut self, torque: Vec3, mode: ForceMode);

    fn basis(&self) -> Basis {
        Basis::from_rotation(self.rotation())
    }
}

/// `+1` for non-negative values, `-1` otherwise. Zero counts as positive.
pub fn sign(value: f32) -> f32 {
    if value >= 0.0 { 1.0 } else { -1.0 }
}

/// Unit vector along `v`, or zero when `v` is too short to have a direction.
pub fn normalize_or_zero(v: Vec3) -> Vec3 {
    let length = v.length();
    if length > NORMALIZE_EPSILON {
        v / length
    } else {
        Vec3::ZERO
    }
}

/// Component of `v` along `onto`.
pub fn project(v: Vec3, onto: Vec3) -> Vec3 {
    let length_squared = onto.length_squared();
    if length_squared < f32::EPSILON {
        return Vec3::ZERO;
    }
    onto * (v.dot(onto) / length_squared)
}

/// Component of `v` orthogonal to `normal`.
pub fn project_on_plane(v: Vec3, normal: Vec3) -> Vec3 {
    v - project(v, normal)
}

/// Unsigned angle between two directions in degrees, `[0, 180]`.
/// Degenerate inputs give 0.
pub fn angle_degrees(a: Vec3, b: Vec3) -> f32 {
    let denominator = (a.length_squared() * b.length_squared()).sqrt();
    if denominator < 1e-15 {
        return 0.0;
    }
    let cos = (a.dot(b) / denominator).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}
