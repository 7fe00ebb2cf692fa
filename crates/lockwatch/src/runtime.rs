use std::future::Future;
use std::sync::Arc;

use lockwatch_core::cluster::NodeRegistry;
use lockwatch_core::config::LockwatchConfig;
use lockwatch_core::error::{LockwatchError, Result};
use lockwatch_runtime::{
    ApiServer, HttpStatusFetcher, Monitor, PollingScheduler, SchedulerConfig, StatusFetcher,
};

/// A configured monitor ready to run.
pub struct Lockwatch {
    config: LockwatchConfig,
    monitor: Arc<Monitor>,
    scheduler: Arc<PollingScheduler>,
}

impl Lockwatch {
    /// Create a new builder for configuring lockwatch.
    pub fn builder() -> LockwatchBuilder {
        LockwatchBuilder::new()
    }

    pub fn config(&self) -> &LockwatchConfig {
        &self.config
    }

    pub fn monitor(&self) -> Arc<Monitor> {
        self.monitor.clone()
    }

    /// Run until Ctrl-C.
    pub async fn run(self) -> Result<()> {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
        })
        .await
    }

    /// Run the polling loop and, when enabled, the projection API until
    /// `shutdown` resolves. The in-flight cycle is allowed to settle.
    pub async fn run_until(self, shutdown: impl Future<Output = ()>) -> Result<()> {
        tracing::info!(
            nodes = self.monitor.registry().len(),
            "lockwatch starting"
        );

        let api_task = if self.config.server.enabled {
            let server = ApiServer::new(self.config.server.clone(), self.monitor.clone());
            let listener = server.bind().await?;
            let mut stop_rx = self.scheduler.shutdown_receiver();
            Some(tokio::spawn(server.serve(listener, async move {
                let _ = stop_rx.wait_for(|stop| *stop).await;
            })))
        } else {
            None
        };

        let scheduler = self.scheduler.clone();
        let scheduler_task = tokio::spawn(async move { scheduler.run().await });

        shutdown.await;
        tracing::info!("Shutdown requested");
        self.scheduler.stop();

        scheduler_task
            .await
            .map_err(|e| LockwatchError::Internal(format!("Polling task failed: {}", e)))?;

        if let Some(task) = api_task {
            task.await
                .map_err(|e| LockwatchError::Internal(format!("API task failed: {}", e)))??;
        }

        tracing::info!("lockwatch stopped");
        Ok(())
    }
}

/// Builder for [`Lockwatch`].
#[derive(Default)]
pub struct LockwatchBuilder {
    config: Option<LockwatchConfig>,
    status_fetcher: Option<Arc<dyn StatusFetcher>>,
}

impl LockwatchBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: LockwatchConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Replace the HTTP status fetcher.
    pub fn status_fetcher(mut self, fetcher: Arc<dyn StatusFetcher>) -> Self {
        self.status_fetcher = Some(fetcher);
        self
    }

    /// Validate the configuration and assemble the monitor.
    pub fn build(self) -> Result<Lockwatch> {
        let config = self
            .config
            .ok_or_else(|| LockwatchError::Config("Configuration is required".to_string()))?;

        let registry = NodeRegistry::from_config(&config)?;
        let fetcher = match self.status_fetcher {
            Some(fetcher) => fetcher,
            None => Arc::new(HttpStatusFetcher::from_config(&config.monitor)?),
        };

        let monitor = Arc::new(Monitor::new(registry, fetcher, &config.monitor));
        let scheduler = Arc::new(PollingScheduler::new(
            monitor.clone(),
            SchedulerConfig::from(&config.monitor),
        ));

        Ok(Lockwatch {
            config,
            monitor,
            scheduler,
        })
    }
}
