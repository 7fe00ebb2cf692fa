//! lockwatch - passive health monitor for a distributed lock service cluster.
//!
//! Polls every configured node, reconciles the answers into one cluster
//! view per cycle and keeps a bounded history of the elections, session and
//! lock activity it infers from consecutive views.

mod logging;
mod runtime;

pub use lockwatch_core;
pub use lockwatch_runtime;

pub use logging::init_logging;
pub use runtime::{Lockwatch, LockwatchBuilder};
