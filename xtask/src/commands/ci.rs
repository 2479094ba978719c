use anyhow::Result;
use clap::{Args, Subcommand};
use xshell::Shell;

use super::{common, demos::Demos, test::Test};

#[derive(Args)]
pub struct Ci {
    #[command(subcommand)]
    command: Option<CiCommand>,
}

#[derive(Subcommand)]
pub enum CiCommand {
    /// Run cargo fmt check
    Fmt,
    /// Run cargo clippy
    Clippy,
    /// Run cargo test over the workspace
    Test(Test),
    /// Run every demo scenario through the CLI
    Demos(Demos),
}

impl Ci {
    pub fn run(&self, sh: &Shell) -> Result<()> {
        match &self.command {
            Some(cmd) => cmd.run(sh),
            None => {
                CiCommand::Fmt.run(sh)?;
                CiCommand::Clippy.run(sh)?;
                CiCommand::Test(Test::default()).run(sh)?;
                CiCommand::Demos(Demos::default()).run(sh)?;
                Ok(())
            }
        }
    }
}

impl CiCommand {
    pub fn run(&self, sh: &Shell) -> Result<()> {
        match self {
            CiCommand::Fmt => common::run_fmt_check(sh),
            CiCommand::Clippy => common::run_clippy(sh),
            CiCommand::Test(test) => test.run(sh),
            CiCommand::Demos(demos) => demos.run(sh),
        }
    }
}
