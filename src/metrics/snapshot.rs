//! Point-in-time metrics composition.

use std::time::Duration;

use serde::{Serialize, Serializer};

use crate::health::evaluator::RaftAggregate;
use crate::metrics::recorder::LatencySnapshot;

fn duration_as_ms<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64() * 1000.0)
}

/// Immutable metrics snapshot composed from the latency recorder and the
/// latest evaluation's raft aggregate. Built fresh on demand, never
/// persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Metrics {
    #[serde(rename = "read_latency_p99_ms", serialize_with = "duration_as_ms")]
    pub read_latency_p99: Duration,
    #[serde(rename = "write_latency_p99_ms", serialize_with = "duration_as_ms")]
    pub write_latency_p99: Duration,
    /// Requests per second over the recorder's window.
    pub request_rate: f64,
    pub db_size: u64,
    pub db_size_in_use: u64,
    pub proposals_committed: u64,
    pub proposals_applied: u64,
    pub proposals_pending: u64,
    pub proposals_failed: u64,
}

/// Compose a [`Metrics`] value. Pure composition: no I/O, no side effects,
/// idempotent for unchanged inputs.
pub fn build_metrics(latency: &LatencySnapshot, raft: &RaftAggregate) -> Metrics {
    Metrics {
        read_latency_p99: latency.p99_read,
        write_latency_p99: latency.p99_write,
        request_rate: latency.request_rate,
        db_size: raft.db_size,
        db_size_in_use: raft.db_size_in_use,
        proposals_committed: raft.proposals.committed,
        proposals_applied: raft.proposals.applied,
        proposals_pending: raft.proposals.pending,
        proposals_failed: raft.proposals.failed,
    }
}
