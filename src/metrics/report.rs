//! Operator-facing text report.
//!
//! Field order and labels are fixed; the report is always complete and
//! well-formed, including under total outage, with health fields reflecting
//! the degraded state.

use std::fmt::Write;

use crate::health::evaluator::ClusterStatus;
use crate::metrics::snapshot::Metrics;

const BYTES_PER_MB: f64 = 1_048_576.0;

fn as_ms(duration: std::time::Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

/// Render status and metrics into the fixed textual report.
pub fn render(status: &ClusterStatus, metrics: &Metrics) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Cluster Health: {}", status.healthy);
    let _ = writeln!(out, "Has Leader: {}", status.has_leader);
    let _ = writeln!(out, "Members: {}", status.member_count);
    let _ = writeln!(out, "Quorum Size: {}", status.quorum_size);
    let _ = writeln!(out, "Leader Changes: {}", status.leader_changes);
    let _ = writeln!(out);
    let _ = writeln!(out, "Performance:");
    let _ = writeln!(out, "  Read Latency P99: {:.2} ms", as_ms(metrics.read_latency_p99));
    let _ = writeln!(out, "  Write Latency P99: {:.2} ms", as_ms(metrics.write_latency_p99));
    let _ = writeln!(out, "  Request Rate: {:.2} ops/sec", metrics.request_rate);
    let _ = writeln!(out);
    let _ = writeln!(out, "Database:");
    let _ = writeln!(
        out,
        "  Size: {} bytes ({:.2} MB)",
        metrics.db_size,
        metrics.db_size as f64 / BYTES_PER_MB
    );
    let _ = writeln!(
        out,
        "  In Use: {} bytes ({:.2} MB)",
        metrics.db_size_in_use,
        metrics.db_size_in_use as f64 / BYTES_PER_MB
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "Raft:");
    let _ = writeln!(out, "  Proposals Committed: {}", metrics.proposals_committed);
    let _ = writeln!(out, "  Proposals Applied: {}", metrics.proposals_applied);
    let _ = writeln!(out, "  Proposals Pending: {}", metrics.proposals_pending);
    let _ = writeln!(out, "  Proposals Failed: {}", metrics.proposals_failed);

    if !status.anomalies.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Anomalies:");
        for anomaly in &status.anomalies {
            let _ = writeln!(out, "  - {}", anomaly);
        }
    }

    out
}
