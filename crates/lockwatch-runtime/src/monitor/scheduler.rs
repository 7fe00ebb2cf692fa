use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use lockwatch_core::config::MonitorConfig;
use tokio::sync::watch;

use super::Monitor;

/// Polling loop configuration.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Delay between the end of one cycle and the start of the next.
    pub interval: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
        }
    }
}

impl From<&MonitorConfig> for SchedulerConfig {
    fn from(config: &MonitorConfig) -> Self {
        Self {
            interval: config.poll_interval(),
        }
    }
}

/// Drives monitor cycles with a completion-based delay.
///
/// One cycle runs immediately, then each following cycle starts `interval`
/// after the previous one fully settled. A slow node stretches the period
/// instead of piling up requests.
///
/// Single use: once stopped, `run` returns immediately. A stop requested
/// before the loop starts is honoured, and the API server watches the same
/// shutdown flag.
pub struct PollingScheduler {
    monitor: Arc<Monitor>,
    config: SchedulerConfig,
    running: Arc<AtomicBool>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl PollingScheduler {
    /// Create a new polling scheduler.
    pub fn new(monitor: Arc<Monitor>, config: SchedulerConfig) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            monitor,
            config,
            running: Arc::new(AtomicBool::new(false)),
            shutdown_tx,
            shutdown_rx,
        }
    }

    pub fn monitor(&self) -> Arc<Monitor> {
        self.monitor.clone()
    }

    /// Check if the loop is running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Get a shutdown receiver.
    pub fn shutdown_receiver(&self) -> watch::Receiver<bool> {
        self.shutdown_rx.clone()
    }

    /// Stop after the in-flight cycle, if any, has settled. Permanent.
    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    /// Run the polling loop until stopped.
    pub async fn run(&self) {
        if self.running.swap(true, Ordering::SeqCst) {
            tracing::warn!("Polling scheduler already running");
            return;
        }
        let mut shutdown_rx = self.shutdown_rx.clone();
        if *shutdown_rx.borrow_and_update() {
            tracing::warn!("Polling scheduler was stopped; not starting");
            self.running.store(false, Ordering::SeqCst);
            return;
        }

        tracing::info!(
            nodes = self.monitor.registry().len(),
            interval_ms = self.config.interval.as_millis() as u64,
            "Polling scheduler starting"
        );

        loop {
            self.monitor.run_cycle().await;

            tokio::select! {
                _ = tokio::time::sleep(self.config.interval) => {}
                _ = shutdown_rx.changed() => {}
            }

            if *shutdown_rx.borrow_and_update() {
                break;
            }
        }

        tracing::info!("Polling scheduler stopped");
        self.running.store(false, Ordering::SeqCst);
    }
}
