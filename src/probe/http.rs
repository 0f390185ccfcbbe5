//! HTTP implementation of [`MemberProber`].
//!
//! Fetches the member's JSON status document and extracts the logical
//! fields the evaluator needs. The wire protocol belongs to the member
//! store; anything that is not a parseable status document counts as
//! `Unreachable`.

use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use http_body_util::BodyExt;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use serde::Deserialize;
use tokio::time;

use super::{MemberEndpoint, MemberProbeResult, MemberProber, ProbeError, ProbeFuture, ProposalCounters};

/// Status document served by each member.
///
/// Proposal counters default to zero for stores that do not expose them;
/// the core fields are required.
#[derive(Debug, Deserialize)]
struct StatusDocument {
    member_id: u64,
    leader_id: u64,
    raft_term: u64,
    raft_index: u64,
    db_size: u64,
    #[serde(default)]
    db_size_in_use: u64,
    #[serde(default)]
    proposals_committed: u64,
    #[serde(default)]
    proposals_applied: u64,
    #[serde(default)]
    proposals_pending: u64,
    #[serde(default)]
    proposals_failed: u64,
}

/// Probes members over HTTP with a bounded per-probe deadline.
pub struct HttpStatusProber {
    client: Client<HttpConnector, Body>,
    status_path: String,
}

impl HttpStatusProber {
    pub fn new(status_path: impl Into<String>) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Self {
            client,
            status_path: status_path.into(),
        }
    }

    async fn fetch_status(
        &self,
        endpoint: &MemberEndpoint,
    ) -> Result<StatusDocument, Box<dyn std::error::Error + Send + Sync>> {
        let request = Request::builder()
            .method("GET")
            .uri(endpoint.status_url(&self.status_path))
            .header("user-agent", "clustermon-probe")
            .body(Body::empty())?;

        let response = self.client.request(request).await?;
        if !response.status().is_success() {
            return Err(format!("non-success status {}", response.status()).into());
        }

        let body = response.into_body().collect().await?.to_bytes();
        Ok(serde_json::from_slice(&body)?)
    }
}

impl MemberProber for HttpStatusProber {
    fn probe<'a>(&'a self, endpoint: &'a MemberEndpoint, timeout: Duration) -> ProbeFuture<'a> {
        Box::pin(async move {
            match time::timeout(timeout, self.fetch_status(endpoint)).await {
                Ok(Ok(doc)) => {
                    let is_leader = doc.leader_id != 0 && doc.leader_id == doc.member_id;
                    MemberProbeResult {
                        endpoint: endpoint.clone(),
                        reachable: true,
                        member_id: doc.member_id,
                        is_leader,
                        raft_term: doc.raft_term,
                        raft_index: doc.raft_index,
                        db_size: doc.db_size,
                        db_size_in_use: doc.db_size_in_use,
                        proposals: ProposalCounters {
                            committed: doc.proposals_committed,
                            applied: doc.proposals_applied,
                            pending: doc.proposals_pending,
                            failed: doc.proposals_failed,
                        },
                        error: None,
                    }
                }
                Ok(Err(e)) => {
                    tracing::warn!(member = %endpoint, error = %e, "Probe failed: unreachable");
                    MemberProbeResult::failed(endpoint.clone(), ProbeError::Unreachable)
                }
                Err(_) => {
                    tracing::warn!(member = %endpoint, "Probe failed: timeout");
                    MemberProbeResult::failed(endpoint.clone(), ProbeError::Timeout)
                }
            }
        })
    }
}
