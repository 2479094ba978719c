use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use glide::{Config, Sample, Scenario};
use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::PathBuf,
};

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum Format {
    #[default]
    Csv,
    Json,
}

#[derive(Args)]
pub struct SimulateArgs {
    /// Path to the scenario file (TOML or JSON).
    pub config: PathBuf,

    /// Output format for the sampled states.
    #[arg(long, value_enum, default_value_t = Format::Csv)]
    pub format: Format,

    /// Where to write the samples.
    ///
    /// Defaults to stdout.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

impl SimulateArgs {
    pub fn run(&self) -> Result<()> {
        super::init_tracing();

        let config = Config::from_file(&self.config)?;
        config.validate()?;

        tracing::info!(
            "Running {} for {} steps of {}s",
            self.config.display(),
            config.simulation.steps,
            config.simulation.dt
        );

        let out: Box<dyn Write> = match &self.output {
            Some(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent).with_context(|| {
                        format!("failed to create output directory {}", parent.display())
                    })?;
                }
                let file = File::create(path)
                    .with_context(|| format!("failed to create {}", path.display()))?;
                Box::new(file)
            }
            None => Box::new(io::stdout().lock()),
        };
        let mut out = BufWriter::new(out);

        let mut scenario = Scenario::new(config);
        match self.format {
            Format::Csv => write_csv(&mut scenario, &mut out)?,
            Format::Json => {
                let samples = scenario.run();
                serde_json::to_writer_pretty(&mut out, &samples)
                    .context("failed to write samples as JSON")?;
                writeln!(out)?;
            }
        }
        out.flush().context("failed to flush samples")?;

        let last = scenario.sample();
        tracing::info!(
            "Finished at t={}s: position {}, rotation {}",
            last.time,
            last.position,
            last.rotation
        );
        if let Some(path) = &self.output {
            println!("Wrote samples to {}", path.display());
        }

        Ok(())
    }
}

fn write_csv<W: Write>(scenario: &mut Scenario, out: &mut W) -> Result<()> {
    writeln!(out, "{}", Sample::CSV_HEADER)?;
    let mut result = Ok(());
    scenario.run_with(|sample| {
        if result.is_ok() {
            result = sample.write_csv(out);
        }
    });
    result.context("failed to write samples as CSV")
}
