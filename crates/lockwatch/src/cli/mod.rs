mod check;
mod init;
mod run;

pub use check::CheckCommand;
pub use init::InitCommand;
pub use run::RunCommand;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// lockwatch - health monitor for a distributed lock service cluster
#[derive(Parser)]
#[command(name = "lockwatch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Poll the cluster continuously and serve the projection API.
    Run(RunCommand),

    /// Poll every node once and print the result.
    Check(CheckCommand),

    /// Write a starter configuration file.
    Init(InitCommand),
}

impl Cli {
    /// Execute the CLI command.
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Run(cmd) => cmd.execute().await,
            Commands::Check(cmd) => cmd.execute().await,
            Commands::Init(cmd) => cmd.execute(),
        }
    }
}
