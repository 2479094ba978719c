//! Orientation-tracking spring.
//!
//! [`OrientationSpring`] pulls a body toward a target orientation with three
//! independent resistances. Each one watches a single body axis flattened
//! onto a plane of the target frame:
//!
//! | tracker   | body axis | plane normal  | companion | torque axis |
//! |-----------|-----------|---------------|-----------|-------------|
//! | `Forward` | right     | target up     | up        | forward     |
//! | `Right`   | forward   | target up     | up        | right       |
//! | `Up`      | forward   | target right  | right     | up          |
//!
//! The flattened axis is ambiguous whenever the body axis crosses the plane
//! normal (a 90° turn). Rather than recomputing it from scratch every tick,
//! each tracker keeps the last chosen direction plus the sign of the
//! companion/normal dot product and picks the branch continuous with them.

use crate::{
    body::{
        Basis, ForceMode, RigidBody, angle_degrees, normalize_or_zero, project,
        project_on_plane, sign,
    },
    curve::{Curve, CurveShape},
    error::{Result, check_non_negative},
};
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkMode {
    /// Torque about the tracker's own body axis, signed by the error.
    #[default]
    AroundAxis,
    /// Torque about the cross product of the current and target axes.
    Cross,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringAxisParams {
    pub force: f32,
    pub damp: f32,
    /// Maps the normalized angular error (`angle / 180°`) to a force scale
    pub force_by_angle: CurveShape,
}

impl Default for SpringAxisParams {
    fn default() -> Self {
        Self {
            force: 5.0,
            damp: 1.0,
            force_by_angle: CurveShape::rising(),
        }
    }
}

impl SpringAxisParams {
    /// Tracker that never applies torque.
    pub fn disabled() -> Self {
        Self {
            force: 0.0,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_non_negative("spring.force", self.force)?;
        check_non_negative("spring.damp", self.damp)?;
        self.force_by_angle.validate()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringParams {
    pub forward: SpringAxisParams,
    pub right: SpringAxisParams,
    pub up: SpringAxisParams,
    pub mode: WorkMode,
}

impl SpringParams {
    pub fn axis(&self, axis: SpringAxis) -> &SpringAxisParams {
        match axis {
            SpringAxis::Forward => &self.forward,
            SpringAxis::Right => &self.right,
            SpringAxis::Up => &self.up,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.forward.validate()?;
        self.right.validate()?;
        self.up.validate()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpringAxis {
    Forward,
    Right,
    Up,
}

impl SpringAxis {
    pub const ALL: [SpringAxis; 3] = [SpringAxis::Forward, SpringAxis::Right, SpringAxis::Up];

    fn index(self) -> usize {
        match self {
            SpringAxis::Forward => 0,
            SpringAxis::Right => 1,
            SpringAxis::Up => 2,
        }
    }

    fn frame(self, body: &Basis, target: &Basis) -> AxisFrame {
        match self {
            SpringAxis::Forward => AxisFrame {
                real_axis: body.right,
                normal: target.up,
                real_normal: body.up,
                rotation_axis: body.forward,
            },
            SpringAxis::Right => AxisFrame {
                real_axis: body.forward,
                normal: target.up,
                real_normal: body.up,
                rotation_axis: body.right,
            },
            SpringAxis::Up => AxisFrame {
                real_axis: body.forward,
                normal: target.right,
                real_normal: body.right,
                rotation_axis: body.up,
            },
        }
    }
}

struct AxisFrame {
    real_axis: Vec3,
    normal: Vec3,
    real_normal: Vec3,
    rotation_axis: Vec3,
}

impl AxisFrame {
    /// The body axis flattened onto the plane orthogonal to `normal`.
    ///
    /// When the body axis is parallel to the normal the flattened axis has
    /// no direction; the companion axis, signed against the normal, takes
    /// its place. The flag reports that substitution.
    fn projection(&self) -> (Vec3, bool) {
        let projection = normalize_or_zero(project_on_plane(self.real_axis, self.normal));
        if projection == Vec3::ZERO {
            let substitute = -sign(self.real_axis.dot(self.normal)) * self.real_normal;
            return (substitute, true);
        }
        (projection, false)
    }

    fn normals_dot(&self) -> f32 {
        sign(self.real_normal.dot(self.normal))
    }
}

/// Per-tracker memory used to resolve the 90° ambiguity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisCache {
    /// Unit vector in the plane orthogonal to the tracker's normal
    pub target_axis: Vec3,
    /// Sign of `dot(companion, normal)` when `target_axis` was adopted
    pub target_normals_dot: f32,
}

impl AxisCache {
    fn from_frame(frame: &AxisFrame) -> Self {
        Self {
            target_axis: frame.projection().0,
            target_normals_dot: frame.normals_dot(),
        }
    }

    fn track(&mut self, frame: &AxisFrame) {
        let (projection, degenerate) = frame.projection();
        if degenerate {
            tracing::trace!(?projection, "degenerate projection, using companion axis");
            self.target_axis = projection;
            return;
        }

        let cached = normalize_or_zero(project(self.target_axis, projection));
        let normals_dot = frame.normals_dot();

        if projection.dot(cached) < 0.0 {
            // The flattened axis flipped. If the companion still faces the
            // normal the same way, the body turned about the normal past
            // 90°: follow it. Otherwise the body axis itself crossed the
            // normal: stay on the cached branch.
            if normals_dot == self.target_normals_dot {
                self.target_axis = projection;
                self.target_normals_dot = normals_dot;
            } else {
                self.target_axis = cached;
            }
            return;
        }

        self.target_axis = projection;
        self.target_normals_dot = normals_dot;
    }
}

#[derive(Debug, Clone)]
pub struct OrientationSpring {
    params: SpringParams,
    target: Quat,
    caches: [AxisCache; 3],
}

impl OrientationSpring {
    /// Spring holding `body` at its current orientation.
    pub fn new<B: RigidBody + ?Sized>(params: SpringParams, body: &B) -> Self {
        let target = body.rotation();
        let mut spring = Self {
            params,
            target,
            caches: [AxisCache {
                target_axis: Vec3::ZERO,
                target_normals_dot: 1.0,
            }; 3],
        };
        spring.reset(body);
        spring
    }

    pub fn target(&self) -> Quat {
        self.target
    }

    pub fn set_target(&mut self, target: Quat) {
        self.target = target.normalize();
    }

    pub fn params(&self) -> &SpringParams {
        &self.params
    }

    pub fn set_params(&mut self, params: SpringParams) {
        self.params = params;
    }

    pub fn cache(&self, axis: SpringAxis) -> AxisCache {
        self.caches[axis.index()]
    }

    /// Re-initialize every tracker from the current pose. Call after
    /// spawning or teleporting the body.
    pub fn reset<B: RigidBody + ?Sized>(&mut self, body: &B) {
        let basis = body.basis();
        let target = Basis::from_rotation(self.target);
        for axis in SpringAxis::ALL {
            self.caches[axis.index()] = AxisCache::from_frame(&axis.frame(&basis, &target));
        }
    }

    /// Apply one tick of spring and damping torque.
    pub fn update<B: RigidBody + ?Sized>(&mut self, body: &mut B, _dt: f32) {
        let basis = body.basis();
        let target = Basis::from_rotation(self.target);

        for axis in SpringAxis::ALL {
            let params = self.params.axis(axis);
            if params.force < f32::EPSILON {
                continue;
            }

            let frame = axis.frame(&basis, &target);
            let cache = &mut self.caches[axis.index()];
            cache.track(&frame);

            let angle = angle_degrees(frame.real_axis, cache.target_axis);
            let force = params.force_by_angle.evaluate(angle / 180.0) * 180.0 * params.force;
            let direction = rotation_direction(self.params.mode, &frame, cache.target_axis);

            body.apply_torque(direction * force, ForceMode::Acceleration);
            let damping = project(body.angular_velocity(), direction) * -params.damp;
            body.apply_torque(damping, ForceMode::Acceleration);
        }
    }
}

fn rotation_direction(mode: WorkMode, frame: &AxisFrame, target_axis: Vec3) -> Vec3 {
    let cross = normalize_or_zero(frame.real_axis.cross(target_axis));
    match mode {
        WorkMode::Cross => cross,
        WorkMode::AroundAxis => frame.rotation_axis * sign(cross.dot(frame.rotation_axis)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimBody;
    use std::f32::consts::PI;

    fn tilted(rotation: Quat) -> SimBody {
        SimBody::new(Vec3::ZERO, rotation)
    }

    #[test]
    fn at_target_applies_nothing() {
        let mut body = SimBody::default();
        let mut spring = OrientationSpring::new(SpringParams::default(), &body);
        spring.update(&mut body, 0.02);
        assert_eq!(body.pending_torque(), Vec3::ZERO);
        assert_eq!(spring.cache(SpringAxis::Forward).target_axis, Vec3::X);
        assert_eq!(spring.cache(SpringAxis::Right).target_axis, Vec3::Z);
        assert_eq!(spring.cache(SpringAxis::Up).target_axis, Vec3::Z);
    }

    #[test]
    fn roll_is_resisted_about_forward() {
        let mut body = tilted(Quat::from_rotation_z(30f32.to_radians()));
        let mut spring = OrientationSpring::new(SpringParams::default(), &body);
        spring.set_target(Quat::IDENTITY);
        spring.reset(&body);

        spring.update(&mut body, 0.02);
        // 30 degrees on a linear curve: 30 / 180 * 180 * 5
        assert!(
            body.pending_torque().abs_diff_eq(Vec3::new(0.0, 0.0, -150.0), 1e-2),
            "{}",
            body.pending_torque()
        );
    }

    #[test]
    fn cross_mode_uses_the_cross_product() {
        let mut body = tilted(Quat::from_rotation_z(30f32.to_radians()));
        let params = SpringParams {
            mode: WorkMode::Cross,
            ..SpringParams::default()
        };
        let mut spring = OrientationSpring::new(params, &body);
        spring.set_target(Quat::IDENTITY);
        spring.reset(&body);

        spring.update(&mut body, 0.02);
        assert!(body.pending_torque().abs_diff_eq(Vec3::new(0.0, 0.0, -150.0), 1e-2));
    }

    #[test]
    fn damping_opposes_spin_along_the_torque_axis() {
        let mut body = SimBody::default().with_velocity(Vec3::ZERO, Vec3::new(0.0, 0.0, 2.0));
        let params = SpringParams {
            forward: SpringAxisParams {
                damp: 3.0,
                ..SpringAxisParams::default()
            },
            right: SpringAxisParams::disabled(),
            up: SpringAxisParams::disabled(),
            mode: WorkMode::AroundAxis,
        };
        let mut spring = OrientationSpring::new(params, &body);
        spring.update(&mut body, 0.02);
        assert!(body.pending_torque().abs_diff_eq(Vec3::new(0.0, 0.0, -6.0), 1e-5));
    }

    #[test]
    fn disabled_axes_are_skipped() {
        let mut body = tilted(Quat::from_rotation_z(30f32.to_radians()));
        let params = SpringParams {
            forward: SpringAxisParams::disabled(),
            right: SpringAxisParams::disabled(),
            up: SpringAxisParams::disabled(),
            mode: WorkMode::AroundAxis,
        };
        let mut spring = OrientationSpring::new(params, &body);
        spring.set_target(Quat::IDENTITY);
        spring.reset(&body);
        let before = spring.cache(SpringAxis::Forward);

        body.teleport(Vec3::ZERO, Quat::from_rotation_z(PI));
        spring.update(&mut body, 0.02);
        assert_eq!(body.pending_torque(), Vec3::ZERO);
        assert_eq!(spring.cache(SpringAxis::Forward), before);
    }

    #[test]
    fn turning_about_the_normal_follows_the_new_branch() {
        let mut body = SimBody::default();
        let mut spring = OrientationSpring::new(SpringParams::default(), &body);

        body.teleport(Vec3::ZERO, Quat::from_rotation_y(PI));
        spring.update(&mut body, 0.02);
        let cache = spring.cache(SpringAxis::Forward);
        assert!(cache.target_axis.abs_diff_eq(-Vec3::X, 1e-5));
        assert_eq!(cache.target_normals_dot, 1.0);
    }

    #[test]
    fn flipping_over_keeps_the_cached_branch() {
        let mut body = SimBody::default();
        let mut spring = OrientationSpring::new(SpringParams::default(), &body);

        body.teleport(Vec3::ZERO, Quat::from_rotation_z(PI));
        spring.update(&mut body, 0.02);
        let cache = spring.cache(SpringAxis::Forward);
        assert!(cache.target_axis.abs_diff_eq(Vec3::X, 1e-5));
        assert_eq!(cache.target_normals_dot, 1.0);
    }

    #[test]
    fn degenerate_projection_uses_the_companion() {
        let mut body = SimBody::default();
        let mut spring = OrientationSpring::new(SpringParams::default(), &body);

        // right points straight up
        body.teleport(Vec3::ZERO, Quat::from_rotation_z(PI / 2.0));
        spring.update(&mut body, 0.02);
        let cache = spring.cache(SpringAxis::Forward);
        assert!(cache.target_axis.abs_diff_eq(Vec3::X, 1e-5));
        assert!((cache.target_axis.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn reset_rebuilds_from_the_pose() {
        let mut body = SimBody::default();
        let mut spring = OrientationSpring::new(SpringParams::default(), &body);
        body.teleport(Vec3::ZERO, Quat::from_rotation_z(PI));
        spring.reset(&body);
        let cache = spring.cache(SpringAxis::Forward);
        assert!(cache.target_axis.abs_diff_eq(-Vec3::X, 1e-5));
        assert_eq!(cache.target_normals_dot, -1.0);
    }

    #[test]
    fn settles_on_the_target() {
        let start = Quat::from_rotation_z(25f32.to_radians())
            * Quat::from_rotation_x(15f32.to_radians())
            * Quat::from_rotation_y(10f32.to_radians());
        let mut body = tilted(start);
        let axis = SpringAxisParams {
            force: 5.0,
            damp: 10.0,
            force_by_angle: CurveShape::rising(),
        };
        let params = SpringParams {
            forward: axis.clone(),
            right: axis.clone(),
            up: axis,
            mode: WorkMode::AroundAxis,
        };
        let mut spring = OrientationSpring::new(params, &body);
        spring.set_target(Quat::IDENTITY);
        spring.reset(&body);

        for _ in 0..1_000 {
            spring.update(&mut body, 0.01);
            body.step(0.01);
        }

        let error = body.rotation().angle_between(Quat::IDENTITY).to_degrees();
        assert!(error < 1.0, "still {error} degrees off");
        assert!(body.angular_velocity().length() < 0.05);
    }
}
