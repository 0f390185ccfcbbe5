//! Health and metrics monitoring for a consensus-backed key-value cluster.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌────────────────────────────────────────────┐
//!                         │                  Monitor                    │
//!                         │                                             │
//!   member endpoints ─────┼─▶ probe ──▶ health (evaluator + leader) ──▶ │ published
//!   (config + watcher)    │   fan-out      quorum / anomalies           │ Evaluation
//!                         │                                             │ (ArcSwap)
//!   proxy request path ───┼─▶ metrics::recorder ─┐                      │
//!                         │                       ├─▶ metrics::snapshot │
//!                         │   latest raft state ──┘       + report      │
//!                         └────────────────┬────────────────────────────┘
//!                                          │
//!                        api (JSON + text) ┴ observability (Prometheus)
//! ```
//!
//! The monitor answers three questions continuously: is the cluster
//! serviceable (quorum, leader), how is it performing (latency percentiles,
//! request rate), and how is consensus progressing (proposal counters, raft
//! term/index, database size).

// Core subsystems
pub mod config;
pub mod health;
pub mod metrics;
pub mod monitor;
pub mod probe;

// Surfaces
pub mod api;
pub mod host;

// Cross-cutting concerns
pub mod error;
pub mod lifecycle;
pub mod observability;

pub use config::MonitorConfig;
pub use error::MonitorError;
pub use health::{Anomaly, ClusterStatus, Evaluation, RaftAggregate};
pub use host::{Host, HostHandle};
pub use lifecycle::Shutdown;
pub use metrics::{LatencyRecorder, Metrics, RequestKind};
pub use monitor::Monitor;
