//! Leader transition tracking across evaluation cycles.
//!
//! # State Transitions
//! ```text
//! NoLeaderObservedYet → HasLastKnownLeader: first non-empty observation (counts)
//! HasLastKnownLeader  → HasLastKnownLeader: different non-empty identity (counts)
//! any state           → same state:         empty observation (ignored)
//! ```
//!
//! An empty observation means "no leader identified this cycle". It neither
//! resets the last known identity nor increments the counter, so a transient
//! leaderless cycle between two sightings of the same leader is not counted
//! as two changes.

/// Detects leader identity turnover across successive polls.
#[derive(Debug, Default)]
pub struct LeaderTracker {
    last_leader: Option<String>,
    changes: u64,
}

impl LeaderTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one cycle's leader observation. Returns true if this
    /// observation constitutes a leader change.
    pub fn observe(&mut self, leader: Option<&str>) -> bool {
        match leader {
            None => false,
            Some(id) if self.last_leader.as_deref() == Some(id) => false,
            Some(id) => {
                let previous = self.last_leader.replace(id.to_string());
                self.changes += 1;
                tracing::info!(
                    previous = previous.as_deref().unwrap_or("none"),
                    current = id,
                    changes = self.changes,
                    "Leader change detected"
                );
                true
            }
        }
    }

    /// Total observed leader changes. Monotonically non-decreasing.
    pub fn changes(&self) -> u64 {
        self.changes
    }

    pub fn last_leader(&self) -> Option<&str> {
        self.last_leader.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observe_all(tracker: &mut LeaderTracker, sequence: &[&str]) {
        for id in sequence {
            let leader = if id.is_empty() { None } else { Some(*id) };
            tracker.observe(leader);
        }
    }

    #[test]
    fn test_turnover_sequence() {
        let mut tracker = LeaderTracker::new();
        observe_all(&mut tracker, &["A", "A", "B", "B", "A"]);
        // First sighting of A, A→B, B→A.
        assert_eq!(tracker.changes(), 3);
        assert_eq!(tracker.last_leader(), Some("A"));
    }

    #[test]
    fn test_leaderless_cycle_does_not_reset() {
        let mut tracker = LeaderTracker::new();
        observe_all(&mut tracker, &["A", "", "A"]);
        assert_eq!(tracker.changes(), 1);
        assert_eq!(tracker.last_leader(), Some("A"));
    }

    #[test]
    fn test_initial_assignment_counts() {
        let mut tracker = LeaderTracker::new();
        assert!(tracker.observe(Some("A")));
        assert_eq!(tracker.changes(), 1);
    }

    #[test]
    fn test_repeated_observation_does_not_count() {
        let mut tracker = LeaderTracker::new();
        tracker.observe(Some("A"));
        assert!(!tracker.observe(Some("A")));
        assert_eq!(tracker.changes(), 1);
    }

    #[test]
    fn test_empty_before_any_leader() {
        let mut tracker = LeaderTracker::new();
        assert!(!tracker.observe(None));
        assert_eq!(tracker.changes(), 0);
        assert_eq!(tracker.last_leader(), None);
    }
}
