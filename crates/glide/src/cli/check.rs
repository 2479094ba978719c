use anyhow::Result;
use clap::Args;
use glide::Config;
use std::path::PathBuf;

#[derive(Args)]
pub struct CheckArgs {
    /// Path to the scenario file (TOML or JSON).
    pub config: PathBuf,
}

impl CheckArgs {
    pub fn run(&self) -> Result<()> {
        super::init_tracing();

        let config = Config::from_file(&self.config)?;
        config.validate()?;

        let simulation = &config.simulation;
        println!("{}: ok", self.config.display());
        println!(
            "  {} steps of {}s ({}s), sampled every {} steps",
            simulation.steps,
            simulation.dt,
            config.duration(),
            simulation.report_every
        );

        let mut components = Vec::new();
        if config.rotator.is_some() {
            components.push(format!("rotator ({} input keys)", config.inputs.len()));
        }
        if config.spring.is_some() {
            components.push("spring".to_string());
        }
        if config.friction.is_some() {
            components.push("friction".to_string());
        }
        if config.follow.is_some() {
            components.push("follow".to_string());
        }
        if components.is_empty() {
            println!("  no controllers; the body coasts");
        } else {
            println!("  controllers: {}", components.join(", "));
        }

        Ok(())
    }
}
