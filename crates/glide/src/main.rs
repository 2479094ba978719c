use anyhow::Result;
use clap::{Parser, Subcommand};

mod cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Simulate(args) => args.run(),
        Command::Check(args) => args.run(),
    }
}

#[derive(Parser)]
#[command(name = "glide", about = "Run motion-control scenarios against a reference body")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a scenario and write sampled body state.
    Simulate(cli::simulate::SimulateArgs),
    /// Parse and validate a scenario without running it.
    Check(cli::check::CheckArgs),
}
