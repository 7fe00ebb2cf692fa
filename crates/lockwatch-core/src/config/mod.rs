mod monitor;
mod nodes;
mod observability;

pub use monitor::{FencePolicy, MonitorConfig};
pub use nodes::{default_nodes, NodeConfig};
pub use observability::LoggingConfig;

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LockwatchError, Result};

/// Root configuration for lockwatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockwatchConfig {
    /// Polling configuration.
    #[serde(default)]
    pub monitor: MonitorConfig,

    /// Monitored nodes, in registry order.
    #[serde(default)]
    pub nodes: Vec<NodeConfig>,

    /// Projection API configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl LockwatchConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| LockwatchError::Config(format!("Failed to read config file: {}", e)))?;

        Self::parse_toml(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let content = substitute_env_vars(content);

        toml::from_str(&content)
            .map_err(|e| LockwatchError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Configuration for the default three-node local cluster.
    pub fn default_local() -> Self {
        Self {
            monitor: MonitorConfig::default(),
            nodes: default_nodes(),
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// Render as TOML, as written by `lockwatch init`.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| LockwatchError::Serialization(format!("Failed to render config: {}", e)))
    }

    /// Reject configurations the monitor cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(LockwatchError::Config(
                "at least one [[nodes]] entry is required".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for node in &self.nodes {
            if node.id.trim().is_empty() {
                return Err(LockwatchError::Config(format!(
                    "node with url '{}' has an empty id",
                    node.url
                )));
            }
            if !seen.insert(node.id.as_str()) {
                return Err(LockwatchError::Config(format!(
                    "duplicate node id '{}'",
                    node.id
                )));
            }
            if node.name.trim().is_empty() {
                return Err(LockwatchError::Config(format!(
                    "node '{}' has an empty name",
                    node.id
                )));
            }
            validate_url(&node.id, &node.url)?;
        }

        if self.monitor.poll_interval_ms == 0 {
            return Err(LockwatchError::Config(
                "monitor.poll_interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.monitor.fetch_timeout_ms == 0 {
            return Err(LockwatchError::Config(
                "monitor.fetch_timeout_ms must be greater than zero".to_string(),
            ));
        }
        if !self.monitor.status_path.starts_with('/') {
            return Err(LockwatchError::Config(format!(
                "monitor.status_path must start with '/', got '{}'",
                self.monitor.status_path
            )));
        }

        Ok(())
    }
}

fn validate_url(id: &str, url: &str) -> Result<()> {
    let parsed = reqwest::Url::parse(url)
        .map_err(|e| LockwatchError::Config(format!("node '{}' has invalid url '{}': {}", id, url, e)))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(LockwatchError::Config(format!(
            "node '{}' url must use http or https, got '{}'",
            id,
            parsed.scheme()
        )));
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(LockwatchError::Config(format!(
            "node '{}' url '{}' has no host",
            id, url
        )));
    }

    Ok(())
}

/// Projection API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Serve the projection over HTTP.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP port.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8090
}

/// Substitute environment variables in the format ${VAR_NAME}.
fn substitute_env_vars(content: &str) -> String {
    let Ok(re) = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}") else {
        return content.to_string();
    };

    let mut result = content.to_string();
    for cap in re.captures_iter(content) {
        let var_name = &cap[1];
        match std::env::var(var_name) {
            Ok(value) => result = result.replace(&cap[0], &value),
            Err(_) => tracing::warn!("Config references unset environment variable {}", var_name),
        }
    }

    result
}
