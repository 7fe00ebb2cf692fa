use serde::{Deserialize, Serialize};

/// One monitored node as written in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Stable identifier, unique within the registry.
    pub id: String,

    /// Human readable name shown by renderers.
    pub name: String,

    /// Base URL of the node's HTTP API.
    pub url: String,
}

impl NodeConfig {
    pub fn new(id: impl Into<String>, name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            url: url.into(),
        }
    }
}

/// The three-node local cluster written by `lockwatch init`.
pub fn default_nodes() -> Vec<NodeConfig> {
    (1..=3)
        .map(|n| {
            NodeConfig::new(
                format!("node-{}", n),
                format!("NODE {}", n),
                format!("http://localhost:{}", 4999 + n),
            )
        })
        .collect()
}
