use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Polling and event derivation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Delay between the end of one cycle and the start of the next.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Per-node budget for one status request.
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_ms: u64,

    /// Path of the status endpoint on every node.
    #[serde(default = "default_status_path")]
    pub status_path: String,

    /// When fence-token events are emitted.
    #[serde(default)]
    pub fence_policy: FencePolicy,
}

impl MonitorConfig {
    /// Inter-cycle delay as a duration.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Per-node fetch timeout as a duration.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval(),
            fetch_timeout_ms: default_fetch_timeout(),
            status_path: default_status_path(),
            fence_policy: FencePolicy::default(),
        }
    }
}

fn default_poll_interval() -> u64 {
    2000
}

fn default_fetch_timeout() -> u64 {
    1500
}

fn default_status_path() -> String {
    "/admin/cluster".to_string()
}

/// Rule for emitting "fence token reached" events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FencePolicy {
    /// Only alongside a lock-count delta in the same cycle.
    #[default]
    Coupled,

    /// Whenever the fence counter rises.
    Independent,
}
