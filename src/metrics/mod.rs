//! Latency recording and metrics composition.
//!
//! # Data Flow
//! ```text
//! Proxy request path (hot):
//!     completed read/write → recorder.rs Record(kind, duration)
//!
//! Polling cadence (cold):
//!     recorder.rs Snapshot()  ┐
//!     latest RaftAggregate    ┴→ snapshot.rs build_metrics() → Metrics
//!     Metrics + ClusterStatus → report.rs render() → operator text
//! ```
//!
//! # Design Decisions
//! - Recording must never block the request path meaningfully; percentile
//!   sorting happens only at snapshot time
//! - Zero samples in the window report zero, not an error
//! - `Metrics` is a pure composition: no independent logic, no I/O

pub mod recorder;
pub mod report;
pub mod snapshot;

pub use recorder::{LatencyRecorder, LatencySnapshot, RequestKind};
pub use report::render;
pub use snapshot::{build_metrics, Metrics};
