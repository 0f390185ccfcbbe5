//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured tracing events)
//!     → telemetry.rs (Prometheus gauges, one update per evaluation)
//! ```
//!
//! # Design Decisions
//! - JSON log format toggled by config for machine parsing
//! - Gauge updates are cheap and happen at polling cadence, never on the
//!   request path

pub mod logging;
pub mod telemetry;
