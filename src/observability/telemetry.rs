//! Prometheus gauge exposition.
//!
//! Mirrors the structured report: one gauge per field, updated once per
//! evaluation cycle. Scrapers see the same values the `/metrics` API
//! endpoint serves as JSON.

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::health::evaluator::ClusterStatus;
use crate::metrics::snapshot::Metrics;

/// Install the Prometheus exporter on its own listener.
///
/// Must run inside the tokio runtime. Failure to bind is logged, not fatal:
/// the monitor itself keeps working without exposition.
pub fn init_exporter(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Prometheus exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install Prometheus exporter"),
    }
}

fn bool_gauge(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

/// Push one evaluation's health fields into the gauges.
pub fn record_status(status: &ClusterStatus) {
    ::metrics::gauge!("clustermon_cluster_healthy").set(bool_gauge(status.healthy));
    ::metrics::gauge!("clustermon_cluster_has_leader").set(bool_gauge(status.has_leader));
    ::metrics::gauge!("clustermon_cluster_members").set(status.member_count as f64);
    ::metrics::gauge!("clustermon_cluster_members_reachable").set(status.reachable_count as f64);
    ::metrics::gauge!("clustermon_cluster_quorum_size").set(status.quorum_size as f64);
    ::metrics::counter!("clustermon_leader_changes_total").absolute(status.leader_changes);
    ::metrics::gauge!("clustermon_anomalies").set(status.anomalies.len() as f64);
}

/// Push the composed metrics snapshot into the gauges.
pub fn record_metrics(metrics: &Metrics) {
    ::metrics::gauge!("clustermon_read_latency_p99_ms")
        .set(metrics.read_latency_p99.as_secs_f64() * 1000.0);
    ::metrics::gauge!("clustermon_write_latency_p99_ms")
        .set(metrics.write_latency_p99.as_secs_f64() * 1000.0);
    ::metrics::gauge!("clustermon_request_rate").set(metrics.request_rate);
    ::metrics::gauge!("clustermon_db_size_bytes").set(metrics.db_size as f64);
    ::metrics::gauge!("clustermon_db_size_in_use_bytes").set(metrics.db_size_in_use as f64);
    ::metrics::counter!("clustermon_proposals_committed_total").absolute(metrics.proposals_committed);
    ::metrics::counter!("clustermon_proposals_applied_total").absolute(metrics.proposals_applied);
    ::metrics::gauge!("clustermon_proposals_pending").set(metrics.proposals_pending as f64);
    ::metrics::counter!("clustermon_proposals_failed_total").absolute(metrics.proposals_failed);
}
