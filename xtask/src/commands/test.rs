use anyhow::Result;
use clap::Args;
use xshell::{Shell, cmd};

#[derive(Args, Default)]
pub struct Test {
    /// Only test this package (e.g. `glide-core`)
    #[arg(long, short)]
    package: Option<String>,

    /// Additional arguments to pass to cargo test
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

impl Test {
    pub fn run(&self, sh: &Shell) -> Result<()> {
        eprintln!("Running cargo test...");
        let package = match &self.package {
            Some(package) => vec!["-p".to_string(), package.clone()],
            None => vec!["--workspace".to_string()],
        };
        let args = &self.args;
        cmd!(sh, "cargo test {package...} {args...}").run()?;
        Ok(())
    }
}
