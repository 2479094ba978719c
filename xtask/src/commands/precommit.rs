use anyhow::Result;
use clap::Args;
use xshell::Shell;

use super::common;

#[derive(Args)]
pub struct Precommit;

impl Precommit {
    pub fn run(&self, sh: &Shell) -> Result<()> {
        common::run_fmt_check(sh)?;
        common::run_clippy(sh)?;
        eprintln!("Precommit checks passed!");
        Ok(())
    }
}
