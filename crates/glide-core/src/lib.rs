//! Smoothed motion control for rigid bodies.
//!
//! The controllers in this crate are called once per fixed physics step and
//! act on a body through the [`body::RigidBody`] trait. They never own the
//! body and never integrate it themselves; all contributions are additive
//! and must be applied before the host steps its integrator.

pub mod axis_driver;
pub mod body;
pub mod curve;
pub mod curve_solver;
pub mod error;
pub mod follow;
pub mod friction;
pub mod orientation_spring;
pub mod rotator;
pub mod sim;
pub mod smart_acceleration;

pub use axis_driver::{AxisDriver, AxisDriverParams, AxisSource, DrivePolicy};
pub use body::{Basis, ForceMode, RigidBody, Space};
pub use curve::{Curve, CurveShape, Keyframe};
pub use curve_solver::{SolverSettings, find_time};
pub use error::ParamsError;
pub use follow::{Follow, FollowParams};
pub use friction::{AxisFriction, FrictionParams};
pub use orientation_spring::{OrientationSpring, SpringAxis, SpringAxisParams, SpringParams, WorkMode};
pub use rotator::{RotatorInputs, RotatorParams, ThreeAxisRotator};
pub use sim::SimBody;
pub use smart_acceleration::{AccelerationParams, DebugView, Mode, Phase, PhaseCurve, SmartAcceleration};
