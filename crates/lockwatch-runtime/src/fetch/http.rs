use std::time::Duration;

use lockwatch_core::cluster::{NodeEndpoint, StatusReport};
use lockwatch_core::config::MonitorConfig;
use lockwatch_core::{LockwatchError, Result};

use super::{FetchError, FetchFuture, StatusFetcher};

/// Largest status body accepted from a node.
pub const MAX_STATUS_BODY: usize = 64 * 1024;

fn body_too_large() -> FetchError {
    FetchError::Decode(format!("status body exceeds {} bytes", MAX_STATUS_BODY))
}

/// Fetches status reports with a plain HTTP GET.
#[derive(Clone)]
pub struct HttpStatusFetcher {
    client: reqwest::Client,
    status_path: String,
}

impl HttpStatusFetcher {
    /// Create a fetcher whose transport enforces `timeout` per request.
    pub fn new(status_path: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LockwatchError::Http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(client, status_path))
    }

    pub fn from_config(config: &MonitorConfig) -> Result<Self> {
        Self::new(config.status_path.clone(), config.fetch_timeout())
    }

    pub fn with_client(client: reqwest::Client, status_path: impl Into<String>) -> Self {
        Self {
            client,
            status_path: status_path.into(),
        }
    }

    async fn get(&self, endpoint: &NodeEndpoint) -> std::result::Result<StatusReport, FetchError> {
        let url = endpoint.url_for(&self.status_path);

        let mut response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Transport(format!("request to {} timed out", url))
            } else {
                FetchError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        if response
            .content_length()
            .is_some_and(|len| len > MAX_STATUS_BODY as u64)
        {
            return Err(body_too_large());
        }

        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?
        {
            if body.len() + chunk.len() > MAX_STATUS_BODY {
                return Err(body_too_large());
            }
            body.extend_from_slice(&chunk);
        }

        StatusReport::from_json(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

impl StatusFetcher for HttpStatusFetcher {
    fn fetch<'a>(&'a self, endpoint: &'a NodeEndpoint) -> FetchFuture<'a> {
        Box::pin(self.get(endpoint))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;
    use std::sync::Arc;

    use axum::{http::StatusCode, routing::get, Json, Router};
    use lockwatch_core::cluster::NodeRegistry;

    use crate::fetch::SnapshotFetcher;

    async fn spawn_cluster() -> SocketAddr {
        let app = Router::new()
            .route(
                "/leader/admin/cluster",
                get(|| async {
                    Json(serde_json::json!({
                        "is_leader": true,
                        "raft_term": 4,
                        "term": 1,
                        "is_ready": true,
                        "stats": {"total_sessions": 3, "total_locks": 2, "fence_counter": 11}
                    }))
                }),
            )
            .route(
                "/follower/admin/cluster",
                get(|| async { Json(serde_json::json!({"is_leader": false, "term": 4})) }),
            )
            .route(
                "/broken/admin/cluster",
                get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
            )
            .route("/garbage/admin/cluster", get(|| async { "<html>nope</html>" }))
            .route(
                "/huge/admin/cluster",
                get(|| async {
                    let padding = " ".repeat(MAX_STATUS_BODY);
                    format!(r#"{{"is_leader": true,{}"term": 1}}"#, padding)
                }),
            )
            .route(
                "/streamed/admin/cluster",
                get(|| async {
                    // No content length; only the running total can catch it.
                    let chunks = (0..16).map(|_| Ok::<_, std::io::Error>(vec![b' '; 8 * 1024]));
                    axum::body::Body::from_stream(futures::stream::iter(chunks))
                }),
            )
            .route(
                "/slow/admin/cluster",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    Json(serde_json::json!({"is_leader": true}))
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    fn endpoint(addr: SocketAddr, name: &str) -> NodeEndpoint {
        NodeEndpoint::new(name, name.to_uppercase(), format!("http://{}/{}", addr, name))
    }

    #[tokio::test]
    async fn test_fetch_leader_status() {
        let addr = spawn_cluster().await;
        let fetcher = HttpStatusFetcher::new("/admin/cluster", Duration::from_secs(2)).unwrap();

        let report = fetcher.fetch(&endpoint(addr, "leader")).await.unwrap();
        assert_eq!(report.is_leader, Some(true));
        assert_eq!(report.term, Some(4));
        assert_eq!(report.total_sessions, 3);
        assert_eq!(report.fence_counter, 11);
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let addr = spawn_cluster().await;
        let fetcher = HttpStatusFetcher::new("/admin/cluster", Duration::from_secs(2)).unwrap();

        let err = fetcher.fetch(&endpoint(addr, "broken")).await.unwrap_err();
        assert!(matches!(err, FetchError::Status(500)));
    }

    #[tokio::test]
    async fn test_unparseable_body() {
        let addr = spawn_cluster().await;
        let fetcher = HttpStatusFetcher::new("/admin/cluster", Duration::from_secs(2)).unwrap();

        let err = fetcher.fetch(&endpoint(addr, "garbage")).await.unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[tokio::test]
    async fn test_oversized_body_rejected() {
        let addr = spawn_cluster().await;
        let fetcher = HttpStatusFetcher::new("/admin/cluster", Duration::from_secs(2)).unwrap();

        let err = fetcher.fetch(&endpoint(addr, "huge")).await.unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));

        let err = fetcher.fetch(&endpoint(addr, "streamed")).await.unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let fetcher = HttpStatusFetcher::new("/admin/cluster", Duration::from_secs(2)).unwrap();
        let err = fetcher.fetch(&endpoint(addr, "leader")).await.unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));
    }

    #[tokio::test]
    async fn test_mixed_cluster_snapshot() {
        let addr = spawn_cluster().await;
        let registry = NodeRegistry::new(vec![
            endpoint(addr, "slow"),
            endpoint(addr, "broken"),
            endpoint(addr, "leader"),
            endpoint(addr, "garbage"),
            endpoint(addr, "follower"),
        ])
        .unwrap();

        let timeout = Duration::from_millis(300);
        let http = HttpStatusFetcher::new("/admin/cluster", Duration::from_secs(10)).unwrap();
        let snapshots = SnapshotFetcher::new(Arc::new(http), timeout)
            .fetch_all(&registry)
            .await;

        let reachable: Vec<bool> = snapshots.iter().map(|s| s.is_reachable()).collect();
        assert_eq!(reachable, vec![false, false, true, false, true]);
        assert!(snapshots[2].claims_leadership());
    }
}
