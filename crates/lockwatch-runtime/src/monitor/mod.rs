mod projection;
mod scheduler;
mod synthesizer;

pub use projection::{DashboardModel, HeadlineStats, NodeCard, NodeRole};
pub use scheduler::{PollingScheduler, SchedulerConfig};
pub use synthesizer::{EventSynthesizer, MonitorState};

use std::sync::Arc;

use chrono::Utc;
use lockwatch_core::cluster::{aggregate, ClusterView, NodeRegistry};
use lockwatch_core::config::{LockwatchConfig, MonitorConfig};
use lockwatch_core::event::{Event, EventLog};
use lockwatch_core::Result;
use tokio::sync::{watch, Mutex};

use crate::fetch::{HttpStatusFetcher, SnapshotFetcher, StatusFetcher};

/// Outcome of one fetch → aggregate → synthesize → publish pass.
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub view: ClusterView,
    /// Events appended this cycle, in generation order.
    pub events: Vec<Event>,
    pub model: DashboardModel,
}

struct MonitorInner {
    synthesizer: EventSynthesizer,
    log: EventLog,
    cycles: u64,
    /// Reachability per registry slot after the last cycle.
    reachable: Vec<Option<bool>>,
}

/// The cluster health monitor.
///
/// Owns the event history and the synthesizer state behind one lock, which
/// is held for a whole cycle so cycles never overlap even when driven from
/// several tasks.
pub struct Monitor {
    registry: NodeRegistry,
    fetcher: SnapshotFetcher,
    inner: Mutex<MonitorInner>,
    model_tx: watch::Sender<Option<DashboardModel>>,
}

impl Monitor {
    /// Create a monitor over `registry` using `source` for status requests.
    pub fn new(
        registry: NodeRegistry,
        source: Arc<dyn StatusFetcher>,
        config: &MonitorConfig,
    ) -> Self {
        let (model_tx, _) = watch::channel(None);
        let slots = registry.len();

        Self {
            fetcher: SnapshotFetcher::new(source, config.fetch_timeout()),
            inner: Mutex::new(MonitorInner {
                synthesizer: EventSynthesizer::new(registry.clone(), config.fence_policy),
                log: EventLog::new(),
                cycles: 0,
                reachable: vec![None; slots],
            }),
            registry,
            model_tx,
        }
    }

    /// Validate the configuration and build an HTTP-backed monitor.
    pub fn from_config(config: &LockwatchConfig) -> Result<Self> {
        let registry = NodeRegistry::from_config(config)?;
        let source = HttpStatusFetcher::from_config(&config.monitor)?;
        Ok(Self::new(registry, Arc::new(source), &config.monitor))
    }

    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    /// Run one complete cycle and publish its projection.
    pub async fn run_cycle(&self) -> CycleReport {
        let mut inner = self.inner.lock().await;

        let snapshots = self.fetcher.fetch_all(&self.registry).await;
        let view = aggregate(snapshots);
        inner.log_reachability(&self.registry, &view);

        let events = inner.synthesizer.observe(&view);
        for event in &events {
            tracing::info!(category = %event.category, "{}", event.message);
        }
        inner.log.extend(events.iter().cloned());
        inner.cycles += 1;

        let model = DashboardModel::project(
            &self.registry,
            &view,
            inner.log.snapshot(),
            inner.cycles,
            Utc::now(),
        );
        self.model_tx.send_replace(Some(model.clone()));

        tracing::debug!(
            cycle = inner.cycles,
            leader = ?view.leader_id,
            reachable = view.reachable_count(),
            events = events.len(),
            "Poll cycle complete"
        );

        CycleReport {
            view,
            events,
            model,
        }
    }

    /// Subscribe to the projection published after each cycle.
    pub fn subscribe(&self) -> watch::Receiver<Option<DashboardModel>> {
        self.model_tx.subscribe()
    }

    /// Latest published projection, `None` before the first cycle completes.
    pub fn latest(&self) -> Option<DashboardModel> {
        self.model_tx.borrow().clone()
    }

    /// Current event history, newest first.
    pub async fn events(&self) -> Vec<Event> {
        self.inner.lock().await.log.snapshot()
    }

    /// Synthesizer state committed by the last comparable cycle.
    pub async fn state(&self) -> Option<MonitorState> {
        self.inner.lock().await.synthesizer.state().cloned()
    }

    /// Number of completed cycles.
    pub async fn cycles(&self) -> u64 {
        self.inner.lock().await.cycles
    }
}

impl MonitorInner {
    fn log_reachability(&mut self, registry: &NodeRegistry, view: &ClusterView) {
        for ((endpoint, snapshot), last) in registry
            .iter()
            .zip(&view.snapshots)
            .zip(self.reachable.iter_mut())
        {
            let now = snapshot.is_reachable();
            match (*last, now) {
                (Some(true), false) => {
                    tracing::warn!(node = %endpoint.id, "Node became unreachable")
                }
                (Some(false), true) => {
                    tracing::info!(node = %endpoint.id, "Node is reachable again")
                }
                (None, false) => tracing::warn!(node = %endpoint.id, "Node unreachable"),
                _ => {}
            }
            *last = Some(now);
        }
    }
}
