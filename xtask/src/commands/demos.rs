use anyhow::Result;
use clap::Args;
use xshell::{Shell, cmd};

use super::common;

const DEFAULT_OUT_DIR: &str = "target/demos";

#[derive(Args)]
pub struct Demos {
    /// Directory for the sampled output, one CSV per scenario
    #[arg(long, default_value = DEFAULT_OUT_DIR)]
    out_dir: String,
}

impl Default for Demos {
    fn default() -> Self {
        Self {
            out_dir: DEFAULT_OUT_DIR.to_string(),
        }
    }
}

impl Demos {
    pub fn run(&self, sh: &Shell) -> Result<()> {
        let scenarios = common::demo_scenarios(sh)?;
        if scenarios.is_empty() {
            anyhow::bail!("no scenarios found in demos/");
        }

        sh.create_dir(&self.out_dir)?;
        for scenario in &scenarios {
            let Some(stem) = scenario.file_stem() else {
                continue;
            };
            let output = format!("{}/{}.csv", self.out_dir, stem.to_string_lossy());

            eprintln!("Simulating {}...", scenario.display());
            cmd!(sh, "cargo run --quiet -p glide -- check {scenario}").run()?;
            cmd!(
                sh,
                "cargo run --quiet -p glide -- simulate {scenario} --output {output}"
            )
            .run()?;
        }

        eprintln!("{} demo scenarios ran cleanly", scenarios.len());
        Ok(())
    }
}
