//! The monitor instance: owns all mutable monitoring state and drives
//! evaluation cycles.
//!
//! # Concurrency
//! - One driver task calls [`Monitor::run`]; cycles never overlap because
//!   the ticker is awaited between evaluations and missed ticks are delayed
//! - The latest [`Evaluation`] is published through an `ArcSwap`: readers
//!   always load a complete snapshot, never a torn one
//! - The request path only touches the latency recorder
//! - Member-list reloads swap an `ArcSwap`'d list picked up at the start of
//!   the next cycle

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use dashmap::DashMap;
use tokio::sync::{broadcast, Mutex};
use tokio::time::{interval, MissedTickBehavior};

use crate::config::schema::MonitorConfig;
use crate::error::MonitorError;
use crate::health::evaluator::{ClusterHealthEvaluator, ClusterStatus, Evaluation, MemberSummary};
use crate::metrics::recorder::{LatencyRecorder, RequestKind};
use crate::metrics::snapshot::{build_metrics, Metrics};
use crate::observability::telemetry;
use crate::probe::{HttpStatusProber, MemberEndpoint, MemberProber};

/// Health and metrics monitor for one cluster.
///
/// All state lives inside the instance; construct one, share it via `Arc`
/// with whatever layer embeds it, and drop it to tear everything down.
pub struct Monitor {
    probe_timeout: Duration,
    interval: Duration,
    members: ArcSwap<Vec<MemberEndpoint>>,
    evaluator: Mutex<ClusterHealthEvaluator>,
    recorder: LatencyRecorder,
    latest: ArcSwap<Evaluation>,
    /// Last observed state per member name. Survives member-list reloads
    /// so a removed member's final state stays visible until restart.
    summaries: DashMap<String, MemberSummary>,
    metrics_enabled: bool,
}

impl std::fmt::Debug for Monitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Monitor")
            .field("probe_timeout", &self.probe_timeout)
            .field("interval", &self.interval)
            .field("metrics_enabled", &self.metrics_enabled)
            .finish_non_exhaustive()
    }
}

impl Monitor {
    /// Build a monitor with an explicit prober (tests use scripted ones).
    pub fn new(config: &MonitorConfig, prober: Arc<dyn MemberProber>) -> Result<Self, MonitorError> {
        let members = config.member_endpoints()?;
        if members.is_empty() {
            return Err(MonitorError::EmptyMemberList);
        }

        Ok(Self {
            probe_timeout: config.probe_timeout(),
            interval: config.evaluation_interval(),
            members: ArcSwap::from_pointee(members),
            evaluator: Mutex::new(ClusterHealthEvaluator::new(prober)),
            recorder: LatencyRecorder::new(config.latency.capacity, config.latency_window()),
            latest: ArcSwap::from_pointee(Evaluation::default()),
            summaries: DashMap::new(),
            metrics_enabled: config.observability.metrics_enabled,
        })
    }

    /// Build a monitor probing members over HTTP.
    pub fn from_config(config: &MonitorConfig) -> Result<Self, MonitorError> {
        let prober = Arc::new(HttpStatusProber::new(config.probe.status_path.clone()));
        Self::new(config, prober)
    }

    /// Hook for the proxy request path: record one completed read or write.
    pub fn record_request(&self, kind: RequestKind, duration: Duration) {
        self.recorder.record(kind, duration);
    }

    /// Latest published evaluation.
    pub fn evaluation(&self) -> Arc<Evaluation> {
        self.latest.load_full()
    }

    /// Latest published cluster status.
    pub fn status(&self) -> ClusterStatus {
        self.latest.load().status.clone()
    }

    /// Compose metrics from the recorder and the latest evaluation.
    pub fn metrics(&self) -> Metrics {
        build_metrics(&self.recorder.snapshot(), &self.latest.load().raft)
    }

    /// Last observed per-member summaries, sorted by name.
    pub fn member_summaries(&self) -> Vec<MemberSummary> {
        let mut summaries: Vec<MemberSummary> =
            self.summaries.iter().map(|entry| entry.value().clone()).collect();
        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        summaries
    }

    /// Replace the member list. An empty list is rejected: the last valid
    /// list stays active.
    pub fn update_members(&self, members: Vec<MemberEndpoint>) {
        if members.is_empty() {
            tracing::warn!("Ignoring member-list update with no members");
            return;
        }
        tracing::info!(count = members.len(), "Member list updated");
        self.members.store(Arc::new(members));
    }

    /// Apply a reloaded configuration. Only the member list is hot-swapped;
    /// cadence and window changes require a restart.
    pub fn apply_config(&self, config: &MonitorConfig) {
        match config.member_endpoints() {
            Ok(members) => self.update_members(members),
            Err(e) => tracing::error!(error = %e, "Reloaded config has invalid member urls"),
        }
    }

    /// Run one evaluation cycle and publish the result.
    pub async fn evaluate_once(&self) -> Arc<Evaluation> {
        let members = self.members.load_full();
        let evaluation = {
            let mut evaluator = self.evaluator.lock().await;
            evaluator.evaluate(&members, self.probe_timeout).await
        };

        for summary in &evaluation.members {
            self.summaries.insert(summary.name.clone(), summary.clone());
        }

        let evaluation = Arc::new(evaluation);
        self.latest.store(Arc::clone(&evaluation));

        if self.metrics_enabled {
            telemetry::record_status(&evaluation.status);
            telemetry::record_metrics(&self.metrics());
        }

        tracing::debug!(
            healthy = evaluation.status.healthy,
            has_leader = evaluation.status.has_leader,
            reachable = evaluation.status.reachable_count,
            members = evaluation.status.member_count,
            "Evaluation complete"
        );
        evaluation
    }

    /// Drive evaluation cycles at the configured interval until shutdown.
    pub async fn run(&self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            members = self.members.load().len(),
            "Monitor starting"
        );

        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.evaluate_once().await;
                }
                _ = shutdown.recv() => {
                    tracing::info!("Monitor received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }
}
