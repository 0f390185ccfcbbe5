//! Cluster-wide health evaluation.
//!
//! One evaluation probes every configured member concurrently, merges the
//! results into a single consistent [`Evaluation`], and feeds the observed
//! leader into the [`LeaderTracker`]. Total evaluation latency is bounded by
//! the per-member timeout, not multiplied by member count.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future;
use serde::Serialize;

use crate::health::leader::LeaderTracker;
use crate::probe::{MemberEndpoint, MemberProbeResult, MemberProber, ProposalCounters};

/// Minimum reachable members required for the cluster to process writes.
pub fn quorum_size(member_count: usize) -> usize {
    member_count / 2 + 1
}

/// Conditions detected during an evaluation that deserve operator
/// attention but never abort the cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Anomaly {
    /// More than one reachable member claimed leadership. Transient
    /// split-view during an election; "no leader" is reported rather than
    /// guessing.
    SplitLeadership { claimants: Vec<String> },
    /// An aggregated proposal counter decreased versus the previous cycle.
    CounterRegression {
        counter: String,
        previous: u64,
        current: u64,
    },
    /// A member reported more bytes in use than its total database size.
    DbSizeIntegrity {
        member: String,
        db_size: u64,
        db_size_in_use: u64,
    },
    /// No member was reachable this cycle.
    TotalOutage,
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anomaly::SplitLeadership { claimants } => {
                write!(f, "split leadership: {} claimants ({})", claimants.len(), claimants.join(", "))
            }
            Anomaly::CounterRegression { counter, previous, current } => {
                write!(f, "proposal counter '{}' regressed from {} to {}", counter, previous, current)
            }
            Anomaly::DbSizeIntegrity { member, db_size, db_size_in_use } => {
                write!(f, "member {} reports {} bytes in use against a {} byte database", member, db_size_in_use, db_size)
            }
            Anomaly::TotalOutage => write!(f, "no reachable members"),
        }
    }
}

/// Point-in-time cluster health classification. Replaced wholesale on each
/// evaluation; readers always see a complete snapshot.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ClusterStatus {
    pub healthy: bool,
    pub has_leader: bool,
    /// Raft id of the identified leader, hex-formatted.
    pub leader_id: Option<String>,
    pub member_count: usize,
    pub reachable_count: usize,
    pub quorum_size: usize,
    pub leader_changes: u64,
    pub anomalies: Vec<Anomaly>,
}

/// Consensus progress and database size, aggregated across the cluster.
///
/// Values come from the identified leader when one exists. With no leader
/// this falls back to the element-wise maximum across reachable members,
/// which is a best-effort heuristic under partition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RaftAggregate {
    pub db_size: u64,
    pub db_size_in_use: u64,
    pub proposals: ProposalCounters,
}

impl RaftAggregate {
    fn from_member(result: &MemberProbeResult) -> Self {
        Self {
            db_size: result.db_size,
            db_size_in_use: result.db_size_in_use,
            proposals: result.proposals,
        }
    }

    fn max_across(reachable: &[&MemberProbeResult]) -> Self {
        let mut aggregate = Self::default();
        for r in reachable {
            aggregate.db_size = aggregate.db_size.max(r.db_size);
            aggregate.db_size_in_use = aggregate.db_size_in_use.max(r.db_size_in_use);
            aggregate.proposals.committed = aggregate.proposals.committed.max(r.proposals.committed);
            aggregate.proposals.applied = aggregate.proposals.applied.max(r.proposals.applied);
            aggregate.proposals.pending = aggregate.proposals.pending.max(r.proposals.pending);
            aggregate.proposals.failed = aggregate.proposals.failed.max(r.proposals.failed);
        }
        aggregate
    }
}

/// Last observed state of one member, retained for the members endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct MemberSummary {
    pub name: String,
    pub url: String,
    pub reachable: bool,
    pub is_leader: bool,
    pub raft_term: u64,
    pub raft_index: u64,
    pub db_size: u64,
    pub error: Option<String>,
}

impl MemberSummary {
    fn from_result(result: &MemberProbeResult) -> Self {
        Self {
            name: result.endpoint.name.clone(),
            url: result.endpoint.url.to_string(),
            reachable: result.reachable,
            is_leader: result.is_leader,
            raft_term: result.raft_term,
            raft_index: result.raft_index,
            db_size: result.db_size,
            error: result.error.map(|e| e.to_string()),
        }
    }
}

/// Immutable result of one evaluation cycle.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Evaluation {
    pub status: ClusterStatus,
    pub raft: RaftAggregate,
    pub members: Vec<MemberSummary>,
}

/// Merges per-member probe results into cluster-level health.
///
/// Holds the only cross-cycle mutable state of the health path: the leader
/// tracker and the previous cycle's aggregate (for regression detection).
pub struct ClusterHealthEvaluator {
    prober: Arc<dyn MemberProber>,
    leader_tracker: LeaderTracker,
    previous: Option<RaftAggregate>,
}

impl ClusterHealthEvaluator {
    pub fn new(prober: Arc<dyn MemberProber>) -> Self {
        Self {
            prober,
            leader_tracker: LeaderTracker::new(),
            previous: None,
        }
    }

    /// Probe every member concurrently and merge the results.
    ///
    /// Dropping the returned future cancels all outstanding probes; results
    /// that completed by then are discarded with it, and the next cycle
    /// starts fresh.
    pub async fn evaluate(
        &mut self,
        members: &[MemberEndpoint],
        per_member_timeout: Duration,
    ) -> Evaluation {
        let prober = Arc::clone(&self.prober);
        let probes = members.iter().map(|m| prober.probe(m, per_member_timeout));
        let results = future::join_all(probes).await;
        self.merge(&results)
    }

    fn merge(&mut self, results: &[MemberProbeResult]) -> Evaluation {
        let member_count = results.len();
        let quorum = quorum_size(member_count);
        let reachable: Vec<&MemberProbeResult> = results.iter().filter(|r| r.reachable).collect();
        let mut anomalies = Vec::new();

        for r in &reachable {
            if r.db_size_in_use > r.db_size {
                let anomaly = Anomaly::DbSizeIntegrity {
                    member: r.endpoint.name.clone(),
                    db_size: r.db_size,
                    db_size_in_use: r.db_size_in_use,
                };
                tracing::warn!(member = %r.endpoint, "{}", anomaly);
                anomalies.push(anomaly);
            }
        }

        let claimants: Vec<&&MemberProbeResult> =
            reachable.iter().filter(|r| r.is_leader).collect();
        let leader = match claimants.as_slice() {
            [single] => Some(**single),
            [] => None,
            _ => {
                let anomaly = Anomaly::SplitLeadership {
                    claimants: claimants.iter().map(|r| r.endpoint.name.clone()).collect(),
                };
                tracing::warn!("{}", anomaly);
                anomalies.push(anomaly);
                None
            }
        };

        if member_count > 0 && reachable.is_empty() {
            tracing::warn!("{}", Anomaly::TotalOutage);
            anomalies.push(Anomaly::TotalOutage);
        }

        let leader_id = leader.map(|r| format!("{:x}", r.member_id));
        self.leader_tracker.observe(leader_id.as_deref());

        let has_leader = leader.is_some();
        let healthy = reachable.len() >= quorum && has_leader;

        let raft = match leader {
            Some(l) => RaftAggregate::from_member(l),
            None => RaftAggregate::max_across(&reachable),
        };

        // Regression is only meaningful when this cycle produced counters.
        if !reachable.is_empty() {
            if let Some(previous) = self.previous {
                let pairs = [
                    ("committed", previous.proposals.committed, raft.proposals.committed),
                    ("applied", previous.proposals.applied, raft.proposals.applied),
                    ("failed", previous.proposals.failed, raft.proposals.failed),
                ];
                for (counter, prev, current) in pairs {
                    if current < prev {
                        let anomaly = Anomaly::CounterRegression {
                            counter: counter.to_string(),
                            previous: prev,
                            current,
                        };
                        tracing::warn!("{}", anomaly);
                        anomalies.push(anomaly);
                    }
                }
            }
            self.previous = Some(raft);
        }

        Evaluation {
            status: ClusterStatus {
                healthy,
                has_leader,
                leader_id,
                member_count,
                reachable_count: reachable.len(),
                quorum_size: quorum,
                leader_changes: self.leader_tracker.changes(),
                anomalies,
            },
            raft,
            members: results.iter().map(MemberSummary::from_result).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::{ProbeError, ProbeFuture};
    use std::collections::HashMap;
    use url::Url;

    /// Prober returning canned results keyed by member name.
    struct ScriptedProber {
        script: HashMap<String, MemberProbeResult>,
    }

    impl MemberProber for ScriptedProber {
        fn probe<'a>(&'a self, endpoint: &'a MemberEndpoint, _timeout: Duration) -> ProbeFuture<'a> {
            let result = self
                .script
                .get(&endpoint.name)
                .cloned()
                .unwrap_or_else(|| MemberProbeResult::failed(endpoint.clone(), ProbeError::Unreachable));
            Box::pin(async move { result })
        }
    }

    fn endpoint(name: &str) -> MemberEndpoint {
        MemberEndpoint::new(name, Url::parse(&format!("http://{}.cluster:2379", name)).unwrap())
    }

    fn up(name: &str, member_id: u64, leader_id: u64) -> MemberProbeResult {
        MemberProbeResult {
            endpoint: endpoint(name),
            reachable: true,
            member_id,
            is_leader: leader_id != 0 && member_id == leader_id,
            raft_term: 2,
            raft_index: 100,
            db_size: 4096,
            db_size_in_use: 2048,
            proposals: ProposalCounters {
                committed: 100,
                applied: 100,
                pending: 0,
                failed: 0,
            },
            error: None,
        }
    }

    fn down(name: &str, error: ProbeError) -> MemberProbeResult {
        MemberProbeResult::failed(endpoint(name), error)
    }

    fn evaluator_with(results: Vec<MemberProbeResult>) -> (ClusterHealthEvaluator, Vec<MemberEndpoint>) {
        let endpoints: Vec<MemberEndpoint> = results.iter().map(|r| r.endpoint.clone()).collect();
        let script = results
            .into_iter()
            .map(|r| (r.endpoint.name.clone(), r))
            .collect();
        (
            ClusterHealthEvaluator::new(Arc::new(ScriptedProber { script })),
            endpoints,
        )
    }

    async fn evaluate(results: Vec<MemberProbeResult>) -> Evaluation {
        let (mut evaluator, endpoints) = evaluator_with(results);
        evaluator.evaluate(&endpoints, Duration::from_millis(100)).await
    }

    #[test]
    fn test_quorum_size_table() {
        assert_eq!(quorum_size(1), 1);
        assert_eq!(quorum_size(2), 2);
        assert_eq!(quorum_size(3), 2);
        assert_eq!(quorum_size(4), 3);
        assert_eq!(quorum_size(5), 3);
        assert_eq!(quorum_size(7), 4);
    }

    #[tokio::test]
    async fn test_healthy_with_one_member_down() {
        // 3 members, 1 timed out, 1 leader, 1 follower: 2 >= quorum(2).
        let evaluation = evaluate(vec![
            down("m1", ProbeError::Timeout),
            up("m2", 2, 2),
            up("m3", 3, 2),
        ])
        .await;
        let status = &evaluation.status;
        assert!(status.healthy);
        assert!(status.has_leader);
        assert_eq!(status.reachable_count, 2);
        assert_eq!(status.quorum_size, 2);
        assert_eq!(status.leader_id.as_deref(), Some("2"));
        assert!(status.anomalies.is_empty());
    }

    #[tokio::test]
    async fn test_unhealthy_below_quorum() {
        // 3 members, 2 unreachable: 1 < quorum(2), regardless of leader claim.
        let evaluation = evaluate(vec![
            up("m1", 1, 1),
            down("m2", ProbeError::Unreachable),
            down("m3", ProbeError::Timeout),
        ])
        .await;
        assert!(!evaluation.status.healthy);
        assert!(evaluation.status.has_leader);
        assert_eq!(evaluation.status.reachable_count, 1);
    }

    #[tokio::test]
    async fn test_split_leadership_reports_no_leader() {
        let evaluation = evaluate(vec![up("m1", 1, 1), up("m2", 2, 2), up("m3", 3, 1)]).await;
        let status = &evaluation.status;
        assert!(!status.has_leader);
        assert!(!status.healthy);
        assert!(status.leader_id.is_none());
        assert!(matches!(
            status.anomalies.as_slice(),
            [Anomaly::SplitLeadership { claimants }] if claimants.len() == 2
        ));
    }

    #[tokio::test]
    async fn test_total_outage() {
        let evaluation = evaluate(vec![
            down("m1", ProbeError::Unreachable),
            down("m2", ProbeError::Unreachable),
            down("m3", ProbeError::Timeout),
        ])
        .await;
        let status = &evaluation.status;
        assert!(!status.healthy);
        assert!(!status.has_leader);
        assert_eq!(status.reachable_count, 0);
        assert!(status.anomalies.contains(&Anomaly::TotalOutage));
        // A complete evaluation still comes back with zeroed aggregates.
        assert_eq!(evaluation.raft, RaftAggregate::default());
    }

    #[tokio::test]
    async fn test_leader_aggregate_is_authoritative() {
        let mut leader = up("m1", 1, 1);
        leader.proposals.committed = 500;
        let mut follower = up("m2", 2, 1);
        follower.proposals.committed = 900; // ahead, but not the leader
        let evaluation = evaluate(vec![leader, follower, up("m3", 3, 1)]).await;
        assert_eq!(evaluation.raft.proposals.committed, 500);
    }

    #[tokio::test]
    async fn test_max_across_followers_without_leader() {
        let mut a = up("m1", 1, 0);
        a.proposals.committed = 300;
        a.db_size = 9000;
        let mut b = up("m2", 2, 0);
        b.proposals.committed = 700;
        b.db_size = 8000;
        let evaluation = evaluate(vec![a, b]).await;
        assert!(!evaluation.status.has_leader);
        assert_eq!(evaluation.raft.proposals.committed, 700);
        assert_eq!(evaluation.raft.db_size, 9000);
    }

    #[tokio::test]
    async fn test_db_size_integrity_anomaly() {
        let mut bad = up("m1", 1, 1);
        bad.db_size = 1000;
        bad.db_size_in_use = 2000;
        let evaluation = evaluate(vec![bad, up("m2", 2, 1), up("m3", 3, 1)]).await;
        // Evaluation still completes and classifies health normally.
        assert!(evaluation.status.healthy);
        assert!(matches!(
            evaluation.status.anomalies.as_slice(),
            [Anomaly::DbSizeIntegrity { member, .. }] if member == "m1"
        ));
    }

    #[tokio::test]
    async fn test_counter_regression_flagged() {
        let (mut evaluator, endpoints) = evaluator_with(vec![up("m1", 1, 1)]);
        evaluator.evaluate(&endpoints, Duration::from_millis(100)).await;

        let mut regressed = up("m1", 1, 1);
        regressed.proposals.committed = 10; // was 100
        let script = HashMap::from([("m1".to_string(), regressed)]);
        evaluator.prober = Arc::new(ScriptedProber { script });

        let evaluation = evaluator.evaluate(&endpoints, Duration::from_millis(100)).await;
        assert!(evaluation.status.anomalies.iter().any(|a| matches!(
            a,
            Anomaly::CounterRegression { counter, previous: 100, current: 10 } if counter == "committed"
        )));
    }

    #[tokio::test]
    async fn test_leader_changes_across_cycles() {
        let (mut evaluator, endpoints) =
            evaluator_with(vec![up("m1", 1, 1), up("m2", 2, 1), up("m3", 3, 1)]);
        let first = evaluator.evaluate(&endpoints, Duration::from_millis(100)).await;
        assert_eq!(first.status.leader_changes, 1);

        // Same leader: no new change.
        let second = evaluator.evaluate(&endpoints, Duration::from_millis(100)).await;
        assert_eq!(second.status.leader_changes, 1);

        // Leadership moves to member 2.
        let script = [up("m1", 1, 2), up("m2", 2, 2), up("m3", 3, 2)]
            .into_iter()
            .map(|r| (r.endpoint.name.clone(), r))
            .collect();
        evaluator.prober = Arc::new(ScriptedProber { script });
        let third = evaluator.evaluate(&endpoints, Duration::from_millis(100)).await;
        assert_eq!(third.status.leader_changes, 2);
        assert_eq!(third.status.leader_id.as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn test_single_member_cluster() {
        let evaluation = evaluate(vec![up("m1", 1, 1)]).await;
        assert_eq!(evaluation.status.quorum_size, 1);
        assert!(evaluation.status.healthy);
    }

    #[tokio::test]
    async fn test_member_summaries_cover_all_members() {
        let evaluation = evaluate(vec![up("m1", 1, 1), down("m2", ProbeError::Timeout)]).await;
        assert_eq!(evaluation.members.len(), 2);
        let down_summary = evaluation.members.iter().find(|m| m.name == "m2").unwrap();
        assert!(!down_summary.reachable);
        assert_eq!(down_summary.error.as_deref(), Some("status query timed out"));
    }
}
