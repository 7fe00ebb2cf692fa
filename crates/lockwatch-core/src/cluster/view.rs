use serde::{Deserialize, Serialize};

use super::node::NodeId;
use super::snapshot::{NodeSnapshot, StatusReport};

/// The monitor's reconciled picture of the cluster for one cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterView {
    /// One snapshot per registered endpoint, in registry order.
    pub snapshots: Vec<NodeSnapshot>,
    /// Selected leader, if any reachable node claims leadership.
    pub leader_id: Option<NodeId>,
}

impl ClusterView {
    /// Snapshot of the selected leader.
    pub fn leader(&self) -> Option<&NodeSnapshot> {
        let leader_id = self.leader_id.as_ref()?;
        self.snapshots.iter().find(|s| &s.endpoint_id == leader_id)
    }

    /// Report of the selected leader.
    pub fn leader_report(&self) -> Option<&StatusReport> {
        self.leader().and_then(|s| s.report.as_ref())
    }

    /// Report used for headline stats: the leader's, else the first reachable node's.
    pub fn headline_report(&self) -> Option<&StatusReport> {
        self.leader_report()
            .or_else(|| self.snapshots.iter().find_map(|s| s.report.as_ref()))
    }

    pub fn reachable_count(&self) -> usize {
        self.snapshots.iter().filter(|s| s.is_reachable()).count()
    }

    pub fn snapshot(&self, id: &NodeId) -> Option<&NodeSnapshot> {
        self.snapshots.iter().find(|s| &s.endpoint_id == id)
    }
}

/// Merge one cycle's snapshots into a cluster view.
///
/// The leader is the first reachable snapshot, in registry order, that claims
/// leadership. Several simultaneous claims are settled by that order. This is
/// a display heuristic: it does not detect split brain and says nothing about
/// what the cluster's consensus actually decided.
pub fn aggregate(snapshots: Vec<NodeSnapshot>) -> ClusterView {
    let leader_id = snapshots
        .iter()
        .find(|s| s.claims_leadership())
        .map(|s| s.endpoint_id.clone());

    ClusterView {
        snapshots,
        leader_id,
    }
}
