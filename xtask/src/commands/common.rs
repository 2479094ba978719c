use anyhow::Result;
use std::path::PathBuf;
use xshell::{Shell, cmd};

/// Run rustfmt check (does not modify files)
pub fn run_fmt_check(sh: &Shell) -> Result<()> {
    eprintln!("Running cargo fmt check...");
    cmd!(sh, "cargo fmt --all -- --check").run()?;
    Ok(())
}

/// Apply rustfmt to all files
pub fn run_fmt(sh: &Shell) -> Result<()> {
    eprintln!("Applying cargo fmt...");
    cmd!(sh, "cargo fmt --all").run()?;
    Ok(())
}

/// Run clippy with all warnings treated as errors
pub fn run_clippy(sh: &Shell) -> Result<()> {
    eprintln!("Running cargo clippy...");
    cmd!(
        sh,
        "cargo clippy --all-features --all-targets --workspace -- -D warnings"
    )
    .run()?;
    Ok(())
}

/// Scenario files under `demos/`, sorted by name
pub fn demo_scenarios(sh: &Shell) -> Result<Vec<PathBuf>> {
    let dir = sh.current_dir().join("demos");
    if !dir.exists() {
        anyhow::bail!("demos directory not found. Are you in the repository root?");
    }

    let mut scenarios: Vec<PathBuf> = sh
        .read_dir(&dir)?
        .into_iter()
        .filter(|path| {
            path.extension()
                .is_some_and(|ext| ext == "toml" || ext == "json")
        })
        .collect();
    scenarios.sort();
    Ok(scenarios)
}
