//! Fixed-step host loop.
//!
//! A [`Scenario`] owns the reference body and every controller named in the
//! [`Config`]. Each step applies all controller contributions first and
//! integrates the body last, so controllers always read the state left by
//! the previous step.

use crate::config::{Config, euler_degrees, to_euler_degrees};
use glam::Vec3;
use glide_core::{
    AxisFriction, Follow, OrientationSpring, RigidBody, SimBody, ThreeAxisRotator,
};
use serde::Serialize;
use std::io::Write;

/// Snapshot of the body and the rotator drivers after a step
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    pub step: u32,
    pub time: f32,
    pub position: Vec3,
    /// Euler angles in degrees, same convention as the config
    pub rotation: Vec3,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    /// Controller values of the right, up and forward drivers
    pub drivers: Vec3,
}

impl Sample {
    pub const CSV_HEADER: &'static str = "step,time,px,py,pz,pitch,yaw,roll,vx,vy,vz,wx,wy,wz,drive_right,drive_up,drive_forward";

    pub fn write_csv<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        write!(out, "{},{}", self.step, self.time)?;
        for v in [
            self.position,
            self.rotation,
            self.velocity,
            self.angular_velocity,
            self.drivers,
        ] {
            write!(out, ",{},{},{}", v.x, v.y, v.z)?;
        }
        writeln!(out)
    }
}

pub struct Scenario {
    config: Config,
    body: SimBody,
    rotator: Option<ThreeAxisRotator>,
    spring: Option<OrientationSpring>,
    friction: Option<AxisFriction>,
    follow: Option<Follow>,
    step: u32,
}

impl Scenario {
    /// Build the body and controllers. The config is expected to be
    /// validated.
    pub fn new(config: Config) -> Self {
        let initial = &config.body;
        let mut body = SimBody::new(initial.position, euler_degrees(initial.rotation))
            .with_velocity(initial.velocity, initial.angular_velocity);
        if let Some(max) = initial.max_angular_speed {
            body = body.with_max_angular_speed(max);
        }

        let rotator = config.rotator.clone().map(|params| {
            ThreeAxisRotator::with_settings(params, config.solver.settings, config.solver.accuracy)
        });

        let spring = config.spring.as_ref().map(|spring| {
            let mut controller = OrientationSpring::new(spring.params.clone(), &body);
            controller.set_target(euler_degrees(spring.target));
            controller.reset(&body);
            controller
        });

        let friction = config.friction.map(AxisFriction::new);
        let follow = config
            .follow
            .as_ref()
            .map(|follow| Follow::new(follow.params, follow.target));

        tracing::debug!(
            rotator = rotator.is_some(),
            spring = spring.is_some(),
            friction = friction.is_some(),
            follow = follow.is_some(),
            "scenario assembled"
        );

        Self {
            config,
            body,
            rotator,
            spring,
            friction,
            follow,
            step: 0,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn body(&self) -> &SimBody {
        &self.body
    }

    pub fn rotator(&self) -> Option<&ThreeAxisRotator> {
        self.rotator.as_ref()
    }

    pub fn spring(&self) -> Option<&OrientationSpring> {
        self.spring.as_ref()
    }

    /// Steps taken so far
    pub fn steps(&self) -> u32 {
        self.step
    }

    pub fn time(&self) -> f32 {
        self.step as f32 * self.config.simulation.dt
    }

    pub fn is_finished(&self) -> bool {
        self.step >= self.config.simulation.steps
    }

    /// Advance one fixed step.
    pub fn step(&mut self) {
        let dt = self.config.simulation.dt;
        let time = self.time();

        if let Some(rotator) = &mut self.rotator {
            let inputs = self.config.inputs_at(time);
            rotator.rotate(&mut self.body, dt, inputs);
        }
        if let Some(spring) = &mut self.spring {
            spring.update(&mut self.body, dt);
        }
        if let Some(friction) = &mut self.friction {
            friction.update(&mut self.body, dt);
        }
        if let Some(follow) = &mut self.follow {
            follow.update(&mut self.body, dt);
        }

        self.body.step(dt);
        self.step += 1;
    }

    pub fn sample(&self) -> Sample {
        let drivers = self
            .rotator
            .as_ref()
            .map(|rotator| {
                Vec3::new(
                    rotator.right().acceleration().value(),
                    rotator.up().acceleration().value(),
                    rotator.forward().acceleration().value(),
                )
            })
            .unwrap_or(Vec3::ZERO);

        Sample {
            step: self.step,
            time: self.time(),
            position: self.body.position(),
            rotation: to_euler_degrees(self.body.rotation()),
            velocity: self.body.linear_velocity(),
            angular_velocity: self.body.angular_velocity(),
            drivers,
        }
    }

    /// Run the remaining steps, calling `report` with the initial state and
    /// then every `report_every` steps.
    pub fn run_with<F: FnMut(&Sample)>(&mut self, mut report: F) {
        let every = self.config.simulation.report_every.max(1);
        if self.step == 0 {
            report(&self.sample());
        }
        while !self.is_finished() {
            self.step();
            if self.step % every == 0 {
                let sample = self.sample();
                tracing::trace!(step = sample.step, time = sample.time, "sample");
                report(&sample);
            }
        }
    }

    /// Run to completion and collect the reported samples.
    pub fn run(&mut self) -> Vec<Sample> {
        let mut samples = Vec::new();
        self.run_with(|sample| samples.push(*sample));
        samples
    }
}
