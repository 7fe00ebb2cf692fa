//! Data model and pure logic for the lockwatch cluster health monitor.
//!
//! Nothing in this crate performs I/O against the monitored cluster; the
//! network and timer driven parts live in `lockwatch-runtime`.

pub mod cluster;
pub mod config;
pub mod error;
pub mod event;

pub use cluster::{
    aggregate, ClusterView, NodeEndpoint, NodeId, NodeRegistry, NodeSnapshot, StatusReport,
};
pub use config::LockwatchConfig;
pub use error::{LockwatchError, Result};
pub use event::{Event, EventCategory, EventLog, EVENT_LOG_CAPACITY};
