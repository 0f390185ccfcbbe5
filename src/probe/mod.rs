//! Member status probing.
//!
//! # Data Flow
//! ```text
//! ClusterHealthEvaluator
//!     → MemberProber::probe(endpoint, timeout)   (one per member, concurrent)
//!     → MemberProbeResult                        (always returned, never panics)
//! ```
//!
//! # Design Decisions
//! - A probe never blocks past its deadline; expiry is classified as `Timeout`
//! - Connection refusal and protocol errors are classified as `Unreachable`
//! - A probe mutates no shared state, which is what makes fan-out safe
//! - `MemberProber` is a trait so evaluations can be driven by scripted
//!   probers in tests

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

pub mod http;

pub use http::HttpStatusProber;

/// Network identity of one cluster member. Immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberEndpoint {
    /// Stable name used in logs, summaries, and metrics labels.
    pub name: String,
    /// Base URL of the member's client-facing API.
    pub url: Url,
}

impl MemberEndpoint {
    pub fn new(name: impl Into<String>, url: Url) -> Self {
        Self {
            name: name.into(),
            url,
        }
    }

    /// Full URL of the member's status document.
    pub fn status_url(&self, status_path: &str) -> String {
        let base = self.url.as_str().trim_end_matches('/');
        format!("{}{}", base, status_path)
    }
}

impl fmt::Display for MemberEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.url)
    }
}

/// Classified probe failure. Both variants are treated identically for
/// health purposes; the distinction is kept for operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeError {
    /// The member did not respond within the deadline.
    #[error("status query timed out")]
    Timeout,
    /// Connection refused, reset, or the response was not a valid status
    /// document.
    #[error("member unreachable")]
    Unreachable,
}

/// Raft proposal counters as reported by one member.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalCounters {
    pub committed: u64,
    pub applied: u64,
    pub pending: u64,
    pub failed: u64,
}

/// Outcome of probing one member. Produced fresh on every probe and owned
/// by the evaluation that requested it; never mutated afterwards.
#[derive(Debug, Clone)]
pub struct MemberProbeResult {
    pub endpoint: MemberEndpoint,
    pub reachable: bool,
    /// Raft member id of the probed member (zero when unreachable).
    pub member_id: u64,
    /// Whether this member claims to be the current leader.
    pub is_leader: bool,
    pub raft_term: u64,
    pub raft_index: u64,
    pub db_size: u64,
    pub db_size_in_use: u64,
    pub proposals: ProposalCounters,
    pub error: Option<ProbeError>,
}

impl MemberProbeResult {
    /// Result for a member that could not be probed.
    pub fn failed(endpoint: MemberEndpoint, error: ProbeError) -> Self {
        Self {
            endpoint,
            reachable: false,
            member_id: 0,
            is_leader: false,
            raft_term: 0,
            raft_index: 0,
            db_size: 0,
            db_size_in_use: 0,
            proposals: ProposalCounters::default(),
            error: Some(error),
        }
    }
}

/// Boxed probe future, so the trait stays usable behind `dyn`.
pub type ProbeFuture<'a> = Pin<Box<dyn Future<Output = MemberProbeResult> + Send + 'a>>;

/// A source of member status documents.
pub trait MemberProber: Send + Sync {
    /// Query one member's status, returning within `timeout`.
    fn probe<'a>(&'a self, endpoint: &'a MemberEndpoint, timeout: Duration) -> ProbeFuture<'a>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint(name: &str, url: &str) -> MemberEndpoint {
        MemberEndpoint::new(name, Url::parse(url).unwrap())
    }

    #[test]
    fn test_status_url_join() {
        let ep = endpoint("m1", "http://127.0.0.1:2379");
        assert_eq!(ep.status_url("/status"), "http://127.0.0.1:2379/status");

        // Trailing slash on the base URL must not produce a double slash.
        let ep = endpoint("m2", "http://127.0.0.1:2379/");
        assert_eq!(ep.status_url("/status"), "http://127.0.0.1:2379/status");
    }

    #[test]
    fn test_failed_result_is_unreachable() {
        let result = MemberProbeResult::failed(
            endpoint("m1", "http://127.0.0.1:2379"),
            ProbeError::Timeout,
        );
        assert!(!result.reachable);
        assert!(!result.is_leader);
        assert_eq!(result.error, Some(ProbeError::Timeout));
        assert_eq!(result.proposals, ProposalCounters::default());
    }

    #[test]
    fn test_probe_error_display() {
        assert_eq!(ProbeError::Timeout.to_string(), "status query timed out");
        assert_eq!(ProbeError::Unreachable.to_string(), "member unreachable");
    }
}
