use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use lockwatch_core::config::ServerConfig;
use lockwatch_core::event::Event;
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::monitor::Monitor;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Create the read-only router over the monitor's latest projection.
pub fn create_api_router(monitor: Arc<Monitor>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/cluster", get(cluster_handler))
        .route("/api/events", get(events_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(monitor)
}

/// HTTP server publishing the dashboard model.
pub struct ApiServer {
    config: ServerConfig,
    monitor: Arc<Monitor>,
}

impl ApiServer {
    pub fn new(config: ServerConfig, monitor: Arc<Monitor>) -> Self {
        Self { config, monitor }
    }

    /// Address configured for binding.
    pub fn addr(&self) -> std::io::Result<SocketAddr> {
        format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))
    }

    /// Bind the configured address.
    pub async fn bind(&self) -> std::io::Result<tokio::net::TcpListener> {
        let listener = tokio::net::TcpListener::bind(self.addr()?).await?;
        tracing::info!("Projection API listening on {}", listener.local_addr()?);
        Ok(listener)
    }

    /// Serve on an already bound listener.
    pub async fn serve(
        self,
        listener: tokio::net::TcpListener,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> std::io::Result<()> {
        let router = create_api_router(self.monitor);
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
    }
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn cluster_handler(State(monitor): State<Arc<Monitor>>) -> Response {
    match monitor.latest() {
        Some(model) => Json(model).into_response(),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({ "error": "no completed poll cycle yet" })),
        )
            .into_response(),
    }
}

async fn events_handler(State(monitor): State<Arc<Monitor>>) -> Json<Vec<Event>> {
    Json(monitor.latest().map(|m| m.events).unwrap_or_default())
}
