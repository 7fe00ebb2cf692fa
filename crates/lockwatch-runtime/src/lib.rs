//! Network and timer driven half of lockwatch: fetching node status,
//! deriving events, the polling loop and the projection API.

pub mod api;
pub mod fetch;
pub mod monitor;

pub use api::{create_api_router, ApiServer};
pub use fetch::{FetchError, HttpStatusFetcher, SnapshotFetcher, StatusFetcher};
pub use monitor::{
    CycleReport, DashboardModel, EventSynthesizer, HeadlineStats, Monitor, MonitorState, NodeCard,
    NodeRole, PollingScheduler, SchedulerConfig,
};
