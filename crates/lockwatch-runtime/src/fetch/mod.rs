mod http;

pub use http::HttpStatusFetcher;

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use futures::future::{self, join_all};
use futures::FutureExt;
use lockwatch_core::cluster::{NodeEndpoint, NodeRegistry, NodeSnapshot, StatusReport};
use thiserror::Error;

/// Why a single node could not be sampled.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("malformed status body: {0}")]
    Decode(String),

    #[error("fetch panicked")]
    Panicked,
}

/// Boxed future returned by a status fetch.
pub type FetchFuture<'a> =
    Pin<Box<dyn Future<Output = Result<StatusReport, FetchError>> + Send + 'a>>;

/// Source of one node's status report.
pub trait StatusFetcher: Send + Sync + 'static {
    /// Issue a single status request. No retries.
    fn fetch<'a>(&'a self, endpoint: &'a NodeEndpoint) -> FetchFuture<'a>;
}

/// Samples every registered node concurrently, isolating failures per node.
#[derive(Clone)]
pub struct SnapshotFetcher {
    source: Arc<dyn StatusFetcher>,
    timeout: Duration,
}

impl SnapshotFetcher {
    pub fn new(source: Arc<dyn StatusFetcher>, timeout: Duration) -> Self {
        Self { source, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// One snapshot per endpoint, aligned with registry order.
    ///
    /// Waits until every request has settled. A failing, slow or panicking
    /// node only affects its own slot.
    pub async fn fetch_all(&self, registry: &NodeRegistry) -> Vec<NodeSnapshot> {
        join_all(registry.iter().map(|endpoint| self.fetch_one(endpoint))).await
    }

    async fn fetch_one(&self, endpoint: &NodeEndpoint) -> NodeSnapshot {
        match self.try_fetch(endpoint).await {
            Ok(report) => NodeSnapshot::reachable(endpoint.id.clone(), report),
            Err(e) => {
                tracing::debug!(node = %endpoint.id, error = %e, "Node unreachable");
                NodeSnapshot::unreachable(endpoint.id.clone())
            }
        }
    }

    async fn try_fetch(&self, endpoint: &NodeEndpoint) -> Result<StatusReport, FetchError> {
        // Deferred so a panic while building the future is caught as well.
        let request = future::lazy(|_| self.source.fetch(endpoint)).flatten();
        let request = AssertUnwindSafe(request).catch_unwind();

        match tokio::time::timeout(self.timeout, request).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(FetchError::Panicked),
            Err(_) => Err(FetchError::Timeout(self.timeout)),
        }
    }
}
