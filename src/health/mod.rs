//! Cluster health evaluation.
//!
//! # Data Flow
//! ```text
//! Periodic driver (monitor.rs)
//!     → evaluator.rs: fan out one probe per member, join under one deadline
//!     → merge results: quorum, leader determination, raft aggregation
//!     → leader.rs: feed the observed leader, bump the change counter
//!     → Evaluation (ClusterStatus + RaftAggregate), published atomically
//! ```
//!
//! # Design Decisions
//! - A probe failure for any subset of members never aborts an evaluation
//! - Zero or multiple leader claims mean "no leader" for that cycle
//! - Anomalies are surfaced on the status, never turned into hard errors

pub mod evaluator;
pub mod leader;

pub use evaluator::{quorum_size, Anomaly, ClusterHealthEvaluator, ClusterStatus, Evaluation, MemberSummary, RaftAggregate};
pub use leader::LeaderTracker;
