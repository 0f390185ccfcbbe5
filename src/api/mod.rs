//! Status API subsystem.
//!
//! Serves the latest published snapshots to external consumers: structured
//! JSON for programs, the fixed text report for operators. No logic of its
//! own beyond reading the monitor.

pub mod server;

pub use server::ApiServer;
