use chrono::{DateTime, Utc};
use lockwatch_core::cluster::{ClusterView, NodeId, NodeRegistry};
use lockwatch_core::event::Event;
use serde::{Deserialize, Serialize};

/// Role of a node as shown to renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    /// The selected cluster leader.
    Leader,
    /// Reachable and not the selected leader.
    Follower,
    /// No usable status this cycle.
    Offline,
    /// Reachable but did not report leadership.
    Unknown,
}

impl NodeRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Leader => "LEADER",
            Self::Follower => "FOLLOWER",
            Self::Offline => "OFFLINE",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for NodeRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-node entry of the dashboard model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeCard {
    pub id: NodeId,
    pub display_name: String,
    pub role: NodeRole,
    pub term: Option<i64>,
    pub ready: bool,
}

/// Cluster-wide counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadlineStats {
    pub sessions: u64,
    pub locks: u64,
    pub fence_counter: u64,
}

/// Display-agnostic model published after every cycle.
///
/// Complete on its own: a renderer can redraw from it without keeping state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardModel {
    pub nodes: Vec<NodeCard>,
    pub leader_id: Option<NodeId>,
    /// Taken from the leader, or from the first reachable node without one.
    pub stats: Option<HeadlineStats>,
    /// Newest first.
    pub events: Vec<Event>,
    pub reachable_nodes: usize,
    /// Number of completed cycles, starting at 1.
    pub cycle: u64,
    pub updated_at: DateTime<Utc>,
}

impl DashboardModel {
    pub fn project(
        registry: &NodeRegistry,
        view: &ClusterView,
        events: Vec<Event>,
        cycle: u64,
        updated_at: DateTime<Utc>,
    ) -> Self {
        let nodes = registry
            .iter()
            .zip(&view.snapshots)
            .map(|(endpoint, snapshot)| {
                let role = match &snapshot.report {
                    None => NodeRole::Offline,
                    Some(_) if view.leader_id.as_ref() == Some(&snapshot.endpoint_id) => {
                        NodeRole::Leader
                    }
                    Some(report) if report.is_leader.is_none() => NodeRole::Unknown,
                    Some(_) => NodeRole::Follower,
                };

                NodeCard {
                    id: endpoint.id.clone(),
                    display_name: endpoint.display_name.clone(),
                    role,
                    term: snapshot.term(),
                    ready: snapshot.is_ready(),
                }
            })
            .collect();

        let stats = view.headline_report().map(|r| HeadlineStats {
            sessions: r.total_sessions,
            locks: r.total_locks,
            fence_counter: r.fence_counter,
        });

        Self {
            nodes,
            leader_id: view.leader_id.clone(),
            stats,
            events,
            reachable_nodes: view.reachable_count(),
            cycle,
            updated_at,
        }
    }

    /// Display name of the leader, if there is one.
    pub fn leader_name(&self) -> Option<&str> {
        self.nodes
            .iter()
            .find(|n| n.role == NodeRole::Leader)
            .map(|n| n.display_name.as_str())
    }
}
