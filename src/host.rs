//! Host abstraction for embedding layers.
//!
//! The surrounding system's main/plugin/proxy/router entry points all need
//! the same capability set over the monitoring core: start, stop, run,
//! status, metrics. One trait covers them; [`Monitor`] is the sole real
//! implementation.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::health::evaluator::ClusterStatus;
use crate::lifecycle::shutdown::Shutdown;
use crate::metrics::snapshot::Metrics;
use crate::monitor::Monitor;

/// Capability set an embedding layer needs from the monitoring core.
pub trait Host: Send + Sync + 'static {
    /// Drive the host until the shutdown signal fires.
    fn run<'a>(&'a self, shutdown: broadcast::Receiver<()>) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>>;

    /// Latest published cluster status.
    fn status(&self) -> ClusterStatus;

    /// Latest composed metrics.
    fn metrics(&self) -> Metrics;
}

impl Host for Monitor {
    fn run<'a>(&'a self, shutdown: broadcast::Receiver<()>) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        Box::pin(Monitor::run(self, shutdown))
    }

    fn status(&self) -> ClusterStatus {
        Monitor::status(self)
    }

    fn metrics(&self) -> Metrics {
        Monitor::metrics(self)
    }
}

/// Running host with start/stop lifecycle.
pub struct HostHandle {
    shutdown: Shutdown,
    task: JoinHandle<()>,
}

impl HostHandle {
    /// Spawn the host's driver task.
    pub fn start(host: Arc<dyn Host>) -> Self {
        let shutdown = Shutdown::new();
        let rx = shutdown.subscribe();
        let task = tokio::spawn(async move { host.run(rx).await });
        Self { shutdown, task }
    }

    /// Trigger shutdown and wait for the driver to exit.
    pub async fn stop(self) {
        self.shutdown.trigger();
        let _ = self.task.await;
    }
}
