use anyhow::Result;
use clap::Parser;
use console::style;
use lockwatch::lockwatch_core::config::LockwatchConfig;
use lockwatch::{init_logging, Lockwatch};
use tracing::info;

/// Run the monitor.
#[derive(Parser)]
pub struct RunCommand {
    /// Configuration file path.
    #[arg(short, long, default_value = "lockwatch.toml")]
    pub config: String,

    /// Port for the projection API (overrides config).
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Poll without serving the projection API.
    #[arg(long)]
    pub no_server: bool,

    /// Enable debug logging.
    #[arg(short, long)]
    pub verbose: bool,
}

impl RunCommand {
    /// Execute the run command.
    pub async fn execute(self) -> Result<()> {
        let config_path = std::path::Path::new(&self.config);
        if !config_path.exists() {
            anyhow::bail!(
                "Configuration file not found: {}\nRun `lockwatch init` to create one.",
                self.config
            );
        }

        let config = self.apply_overrides(LockwatchConfig::from_file(config_path)?);
        init_logging(&config.logging, self.verbose)?;
        info!("Loaded configuration from {}", self.config);

        println!();
        println!(
            "  {} v{}",
            style("LOCKWATCH").bold().cyan(),
            env!("CARGO_PKG_VERSION")
        );
        println!();
        println!(
            "  Watching {} node(s) every {} ms",
            style(config.nodes.len()).bold(),
            config.monitor.poll_interval_ms
        );
        if config.server.enabled {
            println!(
                "  API at {}",
                style(format!(
                    "http://{}:{}/api/cluster",
                    config.server.host, config.server.port
                ))
                .cyan()
            );
        }
        println!();

        let lockwatch = Lockwatch::builder()
            .config(config)
            .build()
            .map_err(|e| anyhow::anyhow!("{}", e))?;

        lockwatch.run().await.map_err(|e| anyhow::anyhow!("{}", e))?;

        println!("\n  Stopped.");
        Ok(())
    }

    fn apply_overrides(&self, mut config: LockwatchConfig) -> LockwatchConfig {
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if self.no_server {
            config.server.enabled = false;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(port: Option<u16>, no_server: bool) -> RunCommand {
        RunCommand {
            config: "lockwatch.toml".to_string(),
            port,
            no_server,
            verbose: false,
        }
    }

    #[test]
    fn test_overrides_leave_config_alone_by_default() {
        let config = command(None, false).apply_overrides(LockwatchConfig::default_local());
        assert_eq!(config.server.port, 8090);
        assert!(config.server.enabled);
    }

    #[test]
    fn test_overrides_applied() {
        let config = command(Some(9100), true).apply_overrides(LockwatchConfig::default_local());
        assert_eq!(config.server.port, 9100);
        assert!(!config.server.enabled);
    }

    #[tokio::test]
    async fn test_missing_config_file() {
        let cmd = RunCommand {
            config: "/nonexistent/lockwatch.toml".to_string(),
            ..command(None, false)
        };
        let err = cmd.execute().await.unwrap_err();
        assert!(err.to_string().contains("Configuration file not found"));
    }
}
