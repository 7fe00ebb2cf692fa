use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{LockwatchConfig, NodeConfig};
use crate::error::{LockwatchError, Result};

/// Identifier of a monitored node, as configured.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A monitored endpoint. Immutable once the registry is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeEndpoint {
    /// Unique node ID.
    pub id: NodeId,
    /// Name shown by renderers.
    pub display_name: String,
    /// Base URL without a trailing slash.
    pub base_url: String,
}

impl NodeEndpoint {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let base_url: String = base_url.into();
        Self {
            id: NodeId::new(id),
            display_name: display_name.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Full URL of a path on this node.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl From<&NodeConfig> for NodeEndpoint {
    fn from(config: &NodeConfig) -> Self {
        Self::new(config.id.clone(), config.name.clone(), config.url.clone())
    }
}

/// Ordered, non-empty list of monitored endpoints.
///
/// Registry order is significant: snapshots are aligned with it and the
/// leader tie-break prefers the earliest claimant.
#[derive(Debug, Clone)]
pub struct NodeRegistry {
    endpoints: Vec<NodeEndpoint>,
}

impl NodeRegistry {
    /// Create a registry from endpoints. Fails when there is nothing to observe.
    pub fn new(endpoints: Vec<NodeEndpoint>) -> Result<Self> {
        if endpoints.is_empty() {
            return Err(LockwatchError::Config(
                "node registry must contain at least one endpoint".to_string(),
            ));
        }
        Ok(Self { endpoints })
    }

    /// Validate the configuration and build the registry from its nodes.
    pub fn from_config(config: &LockwatchConfig) -> Result<Self> {
        config.validate()?;
        Self::new(config.nodes.iter().map(NodeEndpoint::from).collect())
    }

    pub fn endpoints(&self) -> &[NodeEndpoint] {
        &self.endpoints
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    pub fn get(&self, id: &NodeId) -> Option<&NodeEndpoint> {
        self.endpoints.iter().find(|e| &e.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &NodeEndpoint> {
        self.endpoints.iter()
    }
}
