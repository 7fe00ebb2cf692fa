use serde::{Deserialize, Serialize};

use super::node::NodeId;

/// What a reachable node reported about itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    /// Leadership flag; `None` when the node did not say.
    pub is_leader: Option<bool>,
    /// Consensus term, when reported.
    pub term: Option<i64>,
    pub is_ready: bool,
    pub total_sessions: u64,
    pub total_locks: u64,
    pub fence_counter: u64,
}

/// Wire shape of a node's status endpoint.
///
/// Counters may sit at the top level or under `stats`. Leadership comes from
/// `is_leader`, or from a raft `state` string when that flag is absent.
#[derive(Debug, Deserialize)]
struct RawStatus {
    is_leader: Option<bool>,
    state: Option<String>,
    raft_term: Option<i64>,
    term: Option<i64>,
    is_ready: Option<bool>,
    total_sessions: Option<u64>,
    total_locks: Option<u64>,
    fence_counter: Option<u64>,
    stats: Option<RawCounters>,
}

#[derive(Debug, Default, Deserialize)]
struct RawCounters {
    total_sessions: Option<u64>,
    total_locks: Option<u64>,
    fence_counter: Option<u64>,
}

impl StatusReport {
    /// Parse a status body. Any type mismatch rejects the whole body.
    pub fn from_json(body: &[u8]) -> serde_json::Result<Self> {
        let raw: RawStatus = serde_json::from_slice(body)?;
        Ok(Self::from_raw(raw))
    }

    fn from_raw(raw: RawStatus) -> Self {
        let nested = raw.stats.unwrap_or_default();
        Self {
            is_leader: raw
                .is_leader
                .or_else(|| raw.state.as_deref().map(|s| s.eq_ignore_ascii_case("LEADER"))),
            term: raw.raft_term.or(raw.term),
            is_ready: raw.is_ready.unwrap_or(false),
            total_sessions: nested
                .total_sessions
                .or(raw.total_sessions)
                .unwrap_or(0),
            total_locks: nested.total_locks.or(raw.total_locks).unwrap_or(0),
            fence_counter: nested.fence_counter.or(raw.fence_counter).unwrap_or(0),
        }
    }
}

/// One node's state for a single poll cycle.
///
/// An unreachable node carries no report at all, so nothing stale can leak
/// from an earlier cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub endpoint_id: NodeId,
    pub report: Option<StatusReport>,
}

impl NodeSnapshot {
    pub fn reachable(endpoint_id: NodeId, report: StatusReport) -> Self {
        Self {
            endpoint_id,
            report: Some(report),
        }
    }

    pub fn unreachable(endpoint_id: NodeId) -> Self {
        Self {
            endpoint_id,
            report: None,
        }
    }

    pub fn is_reachable(&self) -> bool {
        self.report.is_some()
    }

    /// True only for a reachable node that explicitly claims leadership.
    pub fn claims_leadership(&self) -> bool {
        matches!(
            self.report,
            Some(StatusReport {
                is_leader: Some(true),
                ..
            })
        )
    }

    pub fn term(&self) -> Option<i64> {
        self.report.as_ref().and_then(|r| r.term)
    }

    pub fn is_ready(&self) -> bool {
        self.report.as_ref().is_some_and(|r| r.is_ready)
    }
}
