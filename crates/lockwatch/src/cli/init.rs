use std::path::Path;

use anyhow::Result;
use clap::Parser;
use console::style;
use lockwatch::lockwatch_core::config::LockwatchConfig;

/// Write a starter configuration.
#[derive(Parser)]
pub struct InitCommand {
    /// Output path.
    #[arg(short, long, default_value = "lockwatch.toml")]
    pub config: String,

    /// Overwrite an existing file.
    #[arg(long)]
    pub force: bool,
}

impl InitCommand {
    /// Execute the init command.
    pub fn execute(self) -> Result<()> {
        write_default_config(Path::new(&self.config), self.force)?;
        println!(
            "  {} Wrote {}",
            style("✓").green().bold(),
            style(&self.config).cyan()
        );
        Ok(())
    }
}

fn write_default_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite it.",
            path.display()
        );
    }
    let content = LockwatchConfig::default_local().to_toml_string()?;
    std::fs::write(path, content)?;
    Ok(())
}
