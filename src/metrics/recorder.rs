//! Streaming latency recording over a bounded trailing window.
//!
//! Eviction policy (fixed, tested): each request kind keeps its own ring of
//! at most `capacity` samples (default 4096) AND discards samples older than
//! `window` (default 60 s), whichever evicts first. Percentiles are exact
//! over the retained window, computed by nearest-rank over a sort at
//! snapshot time; memory is bounded at `2 × capacity` samples.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Kind of client request a latency sample belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Read,
    Write,
}

/// One kind's retained samples.
struct SampleWindow {
    samples: VecDeque<(Instant, Duration)>,
    capacity: usize,
    window: Duration,
}

impl SampleWindow {
    fn new(capacity: usize, window: Duration) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
            window,
        }
    }

    fn record(&mut self, at: Instant, duration: Duration) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back((at, duration));
    }

    fn evict_expired(&mut self, now: Instant) {
        while let Some((at, _)) = self.samples.front() {
            if now.duration_since(*at) > self.window {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }

    /// Nearest-rank percentile: the ceil(p·n)-th smallest retained sample.
    fn percentile(&self, p: f64) -> Duration {
        if self.samples.is_empty() {
            return Duration::ZERO;
        }
        let mut sorted: Vec<Duration> = self.samples.iter().map(|(_, d)| *d).collect();
        sorted.sort_unstable();
        let rank = ((p * sorted.len() as f64).ceil() as usize).clamp(1, sorted.len());
        sorted[rank - 1]
    }
}

/// Latency percentiles and request rate over the current window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatencySnapshot {
    pub p99_read: Duration,
    pub p99_write: Duration,
    /// Samples (read + write) in the window divided by the window duration.
    pub request_rate: f64,
}

/// Thread-safe streaming latency container fed by the proxy request path.
///
/// Writers take a short mutex for an append; the infrequent snapshot reader
/// pays the sorting cost. Many concurrent writers, occasional reader.
pub struct LatencyRecorder {
    read: Mutex<SampleWindow>,
    write: Mutex<SampleWindow>,
    window: Duration,
}

impl LatencyRecorder {
    pub fn new(capacity: usize, window: Duration) -> Self {
        Self {
            read: Mutex::new(SampleWindow::new(capacity, window)),
            write: Mutex::new(SampleWindow::new(capacity, window)),
            window,
        }
    }

    /// Record one completed request. Called from concurrent request paths;
    /// bounded and allocation-free past the initial ring allocation.
    pub fn record(&self, kind: RequestKind, duration: Duration) {
        let lane = match kind {
            RequestKind::Read => &self.read,
            RequestKind::Write => &self.write,
        };
        lane.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .record(Instant::now(), duration);
    }

    /// Compute percentiles and rate over the retained window.
    pub fn snapshot(&self) -> LatencySnapshot {
        let now = Instant::now();

        let (p99_read, read_count) = {
            let mut lane = self.read.lock().unwrap_or_else(PoisonError::into_inner);
            lane.evict_expired(now);
            (lane.percentile(0.99), lane.samples.len())
        };
        let (p99_write, write_count) = {
            let mut lane = self.write.lock().unwrap_or_else(PoisonError::into_inner);
            lane.evict_expired(now);
            (lane.percentile(0.99), lane.samples.len())
        };

        LatencySnapshot {
            p99_read,
            p99_write,
            request_rate: (read_count + write_count) as f64 / self.window.as_secs_f64(),
        }
    }
}
