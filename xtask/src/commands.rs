use anyhow::Result;
use clap::Subcommand;
use xshell::Shell;

pub mod ci;
pub mod common;
pub mod demos;
pub mod fmt;
pub mod precommit;
pub mod test;

#[derive(Subcommand)]
pub enum Command {
    /// Run CI checks (fmt, clippy, test, demos). Runs all if no subcommand specified.
    Ci(ci::Ci),
    /// Check and simulate every scenario under demos/
    Demos(demos::Demos),
    /// Apply rustfmt to all files
    Fmt(fmt::Fmt),
    /// Check formatting and lints without running tests
    Precommit(precommit::Precommit),
    /// Run the test suites
    Test(test::Test),
}

impl Command {
    pub fn run(self, sh: &Shell) -> Result<()> {
        match self {
            Command::Ci(cmd) => cmd.run(sh),
            Command::Demos(cmd) => cmd.run(sh),
            Command::Fmt(cmd) => cmd.run(sh),
            Command::Precommit(cmd) => cmd.run(sh),
            Command::Test(cmd) => cmd.run(sh),
        }
    }
}
