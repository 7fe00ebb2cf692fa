use chrono::{DateTime, Utc};
use lockwatch_core::cluster::{ClusterView, NodeId, NodeRegistry};
use lockwatch_core::config::FencePolicy;
use lockwatch_core::event::{Event, EventCategory};

/// Scalars remembered from the last cycle that had a leader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorState {
    pub leader_id: NodeId,
    pub term: Option<i64>,
    pub total_sessions: u64,
    pub total_locks: u64,
    pub fence_counter: u64,
}

/// Turns the transition between consecutive cluster views into events.
///
/// All comparisons read the current leader's report. A cycle without a
/// leader produces nothing and leaves the remembered state untouched, so
/// counters that moved during a leaderless gap surface as one combined delta
/// once a leader is back.
pub struct EventSynthesizer {
    registry: NodeRegistry,
    fence_policy: FencePolicy,
    state: Option<MonitorState>,
}

impl EventSynthesizer {
    pub fn new(registry: NodeRegistry, fence_policy: FencePolicy) -> Self {
        Self {
            registry,
            fence_policy,
            state: None,
        }
    }

    /// State committed by the last comparable cycle, if any.
    pub fn state(&self) -> Option<&MonitorState> {
        self.state.as_ref()
    }

    pub fn observe(&mut self, view: &ClusterView) -> Vec<Event> {
        self.observe_at(view, Utc::now())
    }

    /// Derive this cycle's events, then commit the view's scalars.
    ///
    /// Events come out in the order election, term, session, lock, fence.
    pub fn observe_at(&mut self, view: &ClusterView, now: DateTime<Utc>) -> Vec<Event> {
        let (Some(leader_id), Some(report)) = (view.leader_id.as_ref(), view.leader_report())
        else {
            return Vec::new();
        };

        let mut current = MonitorState {
            leader_id: leader_id.clone(),
            term: report.term,
            total_sessions: report.total_sessions,
            total_locks: report.total_locks,
            fence_counter: report.fence_counter,
        };

        let Some(prev) = self.state.take() else {
            self.state = Some(current);
            return Vec::new();
        };

        let mut events = Vec::new();
        let mut emit = |category, message: String| events.push(Event::at(category, message, now));

        if current.leader_id != prev.leader_id {
            emit(
                EventCategory::Election,
                format!("Leader elected ({})", self.display_name(&current.leader_id)),
            );
        }

        if let (Some(before), Some(after)) = (prev.term, current.term) {
            if before != after {
                emit(
                    EventCategory::Election,
                    format!("Term changed: {} → {}", before, after),
                );
            }
        }

        if let Some(message) = delta_message(
            prev.total_sessions,
            current.total_sessions,
            "session",
            "created",
            "expired/deleted",
        ) {
            emit(EventCategory::Session, message);
        }

        let lock_message = delta_message(
            prev.total_locks,
            current.total_locks,
            "lock",
            "acquired",
            "released",
        );
        let lock_delta = lock_message.is_some();
        if let Some(message) = lock_message {
            emit(EventCategory::Lock, message);
        }

        let fence_rose = current.fence_counter > prev.fence_counter;
        let fence_allowed = match self.fence_policy {
            FencePolicy::Coupled => lock_delta,
            FencePolicy::Independent => true,
        };
        if fence_rose && fence_allowed {
            emit(
                EventCategory::Lock,
                format!("Fence token reached {}", current.fence_counter),
            );
        }

        // An unreported term is not a change; keep tracking the last known one.
        current.term = current.term.or(prev.term);
        self.state = Some(current);

        events
    }

    fn display_name(&self, id: &NodeId) -> String {
        self.registry
            .get(id)
            .map(|e| e.display_name.clone())
            .unwrap_or_else(|| id.to_string())
    }
}

fn delta_message(
    before: u64,
    after: u64,
    noun: &str,
    grew: &str,
    shrank: &str,
) -> Option<String> {
    let (diff, verb) = match after.cmp(&before) {
        std::cmp::Ordering::Greater => (after - before, grew),
        std::cmp::Ordering::Less => (before - after, shrank),
        std::cmp::Ordering::Equal => return None,
    };
    let plural = if diff == 1 { "" } else { "s" };
    Some(format!("{} {}{} {}", diff, noun, plural, verb))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lockwatch_core::cluster::{aggregate, NodeEndpoint, NodeSnapshot, StatusReport};

    struct Counters {
        term: i64,
        sessions: u64,
        locks: u64,
        fence: u64,
    }

    fn counters(term: i64, sessions: u64, locks: u64, fence: u64) -> Counters {
        Counters {
            term,
            sessions,
            locks,
            fence,
        }
    }

    fn registry() -> NodeRegistry {
        NodeRegistry::new(vec![
            NodeEndpoint::new("a", "NODE A", "http://a"),
            NodeEndpoint::new("b", "NODE B", "http://b"),
            NodeEndpoint::new("c", "NODE C", "http://c"),
        ])
        .unwrap()
    }

    /// View where `leader` (if any) reports `c` and every other node is down.
    fn view(leader: Option<&str>, c: Counters) -> ClusterView {
        let snapshots = ["a", "b", "c"]
            .iter()
            .map(|id| {
                if Some(*id) == leader {
                    NodeSnapshot::reachable(
                        NodeId::from(*id),
                        StatusReport {
                            is_leader: Some(true),
                            term: Some(c.term),
                            is_ready: true,
                            total_sessions: c.sessions,
                            total_locks: c.locks,
                            fence_counter: c.fence,
                        },
                    )
                } else {
                    NodeSnapshot::unreachable(NodeId::from(*id))
                }
            })
            .collect();
        aggregate(snapshots)
    }

    fn messages(events: &[Event]) -> Vec<&str> {
        events.iter().map(|e| e.message.as_str()).collect()
    }

    fn synthesizer() -> EventSynthesizer {
        EventSynthesizer::new(registry(), FencePolicy::Coupled)
    }

    #[test]
    fn test_first_cycle_is_baseline() {
        let mut synth = synthesizer();
        let events = synth.observe(&view(Some("a"), counters(1, 5, 2, 9)));

        assert!(events.is_empty());
        let state = synth.state().unwrap();
        assert_eq!(state.leader_id, NodeId::from("a"));
        assert_eq!(state.total_sessions, 5);
        assert_eq!(state.fence_counter, 9);
    }

    #[test]
    fn test_identical_views_produce_nothing() {
        let mut synth = synthesizer();
        let v = view(Some("a"), counters(1, 5, 2, 9));
        synth.observe(&v);
        assert!(synth.observe(&v).is_empty());
        assert!(synth.observe(&v).is_empty());
    }

    #[test]
    fn test_session_created_plural_and_singular() {
        let mut synth = synthesizer();
        synth.observe(&view(Some("a"), counters(1, 0, 0, 0)));

        let events = synth.observe(&view(Some("a"), counters(1, 2, 0, 0)));
        assert_eq!(messages(&events), vec!["2 sessions created"]);
        assert_eq!(events[0].category, EventCategory::Session);

        let events = synth.observe(&view(Some("a"), counters(1, 3, 0, 0)));
        assert_eq!(messages(&events), vec!["1 session created"]);
    }

    #[test]
    fn test_session_decrease_uses_expired_wording() {
        let mut synth = synthesizer();
        synth.observe(&view(Some("a"), counters(1, 5, 0, 0)));

        let events = synth.observe(&view(Some("a"), counters(1, 4, 0, 0)));
        assert_eq!(messages(&events), vec!["1 session expired/deleted"]);

        let events = synth.observe(&view(Some("a"), counters(1, 1, 0, 0)));
        assert_eq!(messages(&events), vec!["3 sessions expired/deleted"]);
        assert!(!events[0].message.contains("created"));
    }

    #[test]
    fn test_lock_deltas() {
        let mut synth = synthesizer();
        synth.observe(&view(Some("a"), counters(1, 0, 2, 5)));

        let events = synth.observe(&view(Some("a"), counters(1, 0, 1, 5)));
        assert_eq!(messages(&events), vec!["1 lock released"]);
        assert_eq!(events[0].category, EventCategory::Lock);

        let events = synth.observe(&view(Some("a"), counters(1, 0, 3, 5)));
        assert_eq!(messages(&events), vec!["2 locks acquired"]);
    }

    #[test]
    fn test_fence_event_accompanies_lock_delta() {
        let mut synth = synthesizer();
        synth.observe(&view(Some("a"), counters(1, 0, 0, 4)));

        let events = synth.observe(&view(Some("a"), counters(1, 0, 1, 5)));
        assert_eq!(
            messages(&events),
            vec!["1 lock acquired", "Fence token reached 5"]
        );
        assert!(events.iter().all(|e| e.category == EventCategory::Lock));
    }

    #[test]
    fn test_fence_without_lock_delta_is_silent_when_coupled() {
        let mut synth = synthesizer();
        synth.observe(&view(Some("a"), counters(1, 0, 1, 4)));

        // Acquire and release inside one poll interval: net-zero locks.
        let events = synth.observe(&view(Some("a"), counters(1, 0, 1, 6)));
        assert!(events.is_empty());
        assert_eq!(synth.state().unwrap().fence_counter, 6);
    }

    #[test]
    fn test_fence_with_release_delta_when_coupled() {
        let mut synth = synthesizer();
        synth.observe(&view(Some("a"), counters(1, 0, 2, 4)));

        let events = synth.observe(&view(Some("a"), counters(1, 0, 1, 5)));
        assert_eq!(
            messages(&events),
            vec!["1 lock released", "Fence token reached 5"]
        );
    }

    #[test]
    fn test_fence_alone_when_independent() {
        let mut synth = EventSynthesizer::new(registry(), FencePolicy::Independent);
        synth.observe(&view(Some("a"), counters(1, 0, 1, 4)));

        let events = synth.observe(&view(Some("a"), counters(1, 0, 1, 6)));
        assert_eq!(messages(&events), vec!["Fence token reached 6"]);
    }

    #[test]
    fn test_election_then_term_order() {
        let mut synth = synthesizer();
        synth.observe(&view(Some("a"), counters(1, 2, 0, 0)));

        let events = synth.observe(&view(Some("b"), counters(2, 2, 0, 5)));
        assert_eq!(
            messages(&events),
            vec!["Leader elected (NODE B)", "Term changed: 1 → 2"]
        );
        assert!(events.iter().all(|e| e.category == EventCategory::Election));
    }

    #[test]
    fn test_term_change_without_leader_change() {
        let mut synth = synthesizer();
        synth.observe(&view(Some("a"), counters(3, 0, 0, 0)));

        let events = synth.observe(&view(Some("a"), counters(4, 0, 0, 0)));
        assert_eq!(messages(&events), vec!["Term changed: 3 → 4"]);
    }

    #[test]
    fn test_full_event_order() {
        let mut synth = EventSynthesizer::new(registry(), FencePolicy::Coupled);
        synth.observe(&view(Some("a"), counters(1, 0, 0, 0)));

        let events = synth.observe(&view(Some("c"), counters(2, 1, 1, 1)));
        let categories: Vec<EventCategory> = events.iter().map(|e| e.category).collect();
        assert_eq!(
            categories,
            vec![
                EventCategory::Election,
                EventCategory::Election,
                EventCategory::Session,
                EventCategory::Lock,
                EventCategory::Lock,
            ]
        );
    }

    #[test]
    fn test_leaderless_cycle_leaves_state_untouched() {
        let mut synth = synthesizer();
        synth.observe(&view(Some("a"), counters(1, 3, 1, 2)));
        let before = synth.state().cloned();

        assert!(synth.observe(&view(None, counters(0, 0, 0, 0))).is_empty());
        assert_eq!(synth.state().cloned(), before);
    }

    #[test]
    fn test_leaderless_first_cycle_sets_no_baseline() {
        let mut synth = synthesizer();
        assert!(synth.observe(&view(None, counters(0, 0, 0, 0))).is_empty());
        assert!(synth.state().is_none());

        assert!(synth.observe(&view(Some("b"), counters(1, 4, 0, 0))).is_empty());
        assert_eq!(synth.state().unwrap().leader_id, NodeId::from("b"));
    }

    #[test]
    fn test_no_false_delta_after_leaderless_gap() {
        let mut synth = synthesizer();
        synth.observe(&view(Some("a"), counters(1, 3, 1, 2)));
        synth.observe(&view(None, counters(0, 0, 0, 0)));

        let events = synth.observe(&view(Some("a"), counters(1, 3, 1, 2)));
        assert!(events.is_empty());
    }

    #[test]
    fn test_gap_changes_collapse_into_one_delta() {
        let mut synth = synthesizer();
        synth.observe(&view(Some("a"), counters(1, 3, 0, 0)));
        synth.observe(&view(None, counters(0, 0, 0, 0)));

        let events = synth.observe(&view(Some("a"), counters(1, 10, 0, 0)));
        assert_eq!(messages(&events), vec!["7 sessions created"]);
    }

    #[test]
    fn test_unknown_term_stalls_tracking() {
        let mut synth = synthesizer();
        synth.observe(&view(Some("a"), counters(5, 0, 0, 0)));

        let mut unknown_term = view(Some("a"), counters(0, 0, 0, 0));
        if let Some(report) = unknown_term.snapshots[0].report.as_mut() {
            report.term = None;
        }
        assert!(synth.observe(&unknown_term).is_empty());
        assert_eq!(synth.state().unwrap().term, Some(5));

        let events = synth.observe(&view(Some("a"), counters(6, 0, 0, 0)));
        assert_eq!(messages(&events), vec!["Term changed: 5 → 6"]);
    }

    #[test]
    fn test_events_share_cycle_timestamp() {
        let mut synth = synthesizer();
        let now = Utc::now();
        synth.observe_at(&view(Some("a"), counters(1, 0, 0, 0)), now);

        let events = synth.observe_at(&view(Some("b"), counters(2, 1, 0, 0)), now);
        assert_eq!(events.len(), 3);
        assert!(events.iter().all(|e| e.timestamp == now));
    }

    #[test]
    fn test_delta_message_wording() {
        assert_eq!(
            delta_message(0, 1, "lock", "acquired", "released").as_deref(),
            Some("1 lock acquired")
        );
        assert_eq!(
            delta_message(5, 2, "lock", "acquired", "released").as_deref(),
            Some("3 locks released")
        );
        assert_eq!(delta_message(2, 2, "lock", "acquired", "released"), None);
    }
}
