use anyhow::{Context, Result};
use glam::{EulerRot, Quat, Vec3};
use glide_core::{FollowParams, FrictionParams, RotatorInputs, RotatorParams, SolverSettings, SpringParams};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// A complete scenario: one body and the controllers acting on it
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub simulation: SimulationConfig,

    /// Initial state of the simulated body
    #[serde(default)]
    pub body: BodyConfig,

    /// Curve solver settings shared by every acceleration controller
    #[serde(default)]
    pub solver: SolverConfig,

    /// Pitch, yaw and roll drivers
    pub rotator: Option<RotatorParams>,

    /// Piecewise constant rotator inputs, sorted by `at`
    #[serde(default)]
    pub inputs: Vec<InputKey>,

    pub spring: Option<SpringConfig>,

    pub friction: Option<FrictionParams>,

    pub follow: Option<FollowConfig>,
}

/// Fixed-step settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Seconds per step
    #[serde(default = "default_dt")]
    pub dt: f32,

    #[serde(default = "default_steps")]
    pub steps: u32,

    /// Emit a sample every this many steps
    #[serde(default = "default_report_every")]
    pub report_every: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            dt: default_dt(),
            steps: default_steps(),
            report_every: default_report_every(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyConfig {
    pub position: Vec3,

    /// Euler angles in degrees, applied yaw (Y), pitch (X), roll (Z)
    pub rotation: Vec3,

    pub velocity: Vec3,

    pub angular_velocity: Vec3,

    pub max_angular_speed: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    #[serde(flatten)]
    pub settings: SolverSettings,

    /// How close a seek has to land to its target before it stops
    #[serde(default = "default_accuracy")]
    pub accuracy: f32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            settings: SolverSettings::default(),
            accuracy: default_accuracy(),
        }
    }
}

/// Rotator inputs that take effect at `at` seconds
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InputKey {
    pub at: f32,

    #[serde(flatten)]
    pub inputs: RotatorInputs,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpringConfig {
    #[serde(flatten)]
    pub params: SpringParams,

    /// Target orientation as Euler angles in degrees
    #[serde(default)]
    pub target: Vec3,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FollowConfig {
    #[serde(flatten)]
    pub params: FollowParams,

    /// World-space point to follow
    #[serde(default)]
    pub target: Vec3,
}

fn default_dt() -> f32 {
    0.02
}

fn default_steps() -> u32 {
    250
}

fn default_report_every() -> u32 {
    1
}

fn default_accuracy() -> f32 {
    0.02
}

/// Convert Euler angles in degrees (YXZ order) to a rotation
pub fn euler_degrees(angles: Vec3) -> Quat {
    Quat::from_euler(
        EulerRot::YXZ,
        angles.y.to_radians(),
        angles.x.to_radians(),
        angles.z.to_radians(),
    )
}

/// Inverse of [`euler_degrees`]
pub fn to_euler_degrees(rotation: Quat) -> Vec3 {
    let (yaw, pitch, roll) = rotation.to_euler(EulerRot::YXZ);
    Vec3::new(pitch.to_degrees(), yaw.to_degrees(), roll.to_degrees())
}

impl Config {
    /// Load configuration from a file, auto-detecting TOML or JSON format
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario file {}", path.display()))?;

        match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => Self::from_toml(&content),
            Some("json") => Self::from_json(&content),
            _ => Self::from_toml(&content).or_else(|_| Self::from_json(&content)),
        }
    }

    /// Parse configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("failed to parse scenario as TOML")
    }

    /// Parse configuration from JSON string
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("failed to parse scenario as JSON")
    }

    pub fn validate(&self) -> Result<()> {
        let simulation = &self.simulation;
        if !simulation.dt.is_finite() || simulation.dt <= 0.0 {
            anyhow::bail!("simulation.dt must be positive, got {}", simulation.dt);
        }
        if simulation.steps == 0 {
            anyhow::bail!("simulation.steps must be at least 1");
        }
        if simulation.report_every == 0 {
            anyhow::bail!("simulation.report_every must be at least 1");
        }

        if let Some(max) = self.body.max_angular_speed {
            if !max.is_finite() || max <= 0.0 {
                anyhow::bail!("body.max_angular_speed must be positive, got {max}");
            }
        }

        self.solver.settings.validate().context("invalid [solver]")?;
        if !self.solver.accuracy.is_finite() || self.solver.accuracy <= 0.0 {
            anyhow::bail!("solver.accuracy must be positive, got {}", self.solver.accuracy);
        }

        if let Some(rotator) = &self.rotator {
            rotator.validate().context("invalid [rotator]")?;
        } else if !self.inputs.is_empty() {
            anyhow::bail!("inputs are scheduled but no [rotator] is configured");
        }
        for (i, key) in self.inputs.iter().enumerate() {
            if !key.at.is_finite() {
                anyhow::bail!("inputs[{i}].at must be finite");
            }
            if i > 0 && key.at < self.inputs[i - 1].at {
                anyhow::bail!("inputs must be sorted by time; inputs[{i}] starts at {}", key.at);
            }
        }

        if let Some(spring) = &self.spring {
            spring.params.validate().context("invalid [spring]")?;
        }
        if let Some(friction) = &self.friction {
            friction.validate().context("invalid [friction]")?;
        }
        if let Some(follow) = &self.follow {
            follow.params.validate().context("invalid [follow]")?;
        }

        Ok(())
    }

    /// Rotator inputs in effect at `time`. Before the first key all inputs
    /// are zero.
    pub fn inputs_at(&self, time: f32) -> RotatorInputs {
        let active = self.inputs.partition_point(|key| key.at <= time);
        active
            .checked_sub(1)
            .map(|i| self.inputs[i].inputs)
            .unwrap_or_default()
    }

    /// Simulated duration in seconds
    pub fn duration(&self) -> f32 {
        self.simulation.dt * self.simulation.steps as f32
    }
}
