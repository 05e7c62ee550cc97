//! Request statistics for the score server

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Snapshot of the requests served so far
#[derive(Debug, Clone)]
pub struct ServerStats {
    /// Submissions stored
    pub accepted: u64,
    /// Queries answered with an error reply
    pub rejected: u64,
    /// Top list and best-score lookups answered
    pub lookups: u64,
    /// Timestamp when stats collection started
    pub start_time: Instant,
}

impl ServerStats {
    pub fn new() -> Self {
        Self {
            accepted: 0,
            rejected: 0,
            lookups: 0,
            start_time: Instant::now(),
        }
    }

    /// Total number of queries seen
    pub fn total(&self) -> u64 {
        self.accepted + self.rejected + self.lookups
    }
}

impl Default for ServerStats {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ServerStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Accepted: {}, Rejected: {}, Lookups: {}, Uptime: {}s",
            self.accepted,
            self.rejected,
            self.lookups,
            self.start_time.elapsed().as_secs()
        )
    }
}

/// Thread-safe statistics tracker
///
/// Uses atomic operations for lock-free concurrent updates
#[derive(Debug, Clone)]
pub struct StatsTracker {
    accepted: Arc<AtomicU64>,
    rejected: Arc<AtomicU64>,
    lookups: Arc<AtomicU64>,
    start_time: Instant,
}

impl StatsTracker {
    pub fn new() -> Self {
        Self {
            accepted: Arc::new(AtomicU64::new(0)),
            rejected: Arc::new(AtomicU64::new(0)),
            lookups: Arc::new(AtomicU64::new(0)),
            start_time: Instant::now(),
        }
    }

    pub fn add_accepted(&self) {
        self.accepted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_lookup(&self) {
        self.lookups.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current statistics snapshot
    pub fn get_stats(&self) -> ServerStats {
        ServerStats {
            accepted: self.accepted.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            lookups: self.lookups.load(Ordering::Relaxed),
            start_time: self.start_time,
        }
    }

    pub fn reset(&self) {
        self.accepted.store(0, Ordering::Relaxed);
        self.rejected.store(0, Ordering::Relaxed);
        self.lookups.store(0, Ordering::Relaxed);
    }
}

impl Default for StatsTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_creation() {
        let stats = ServerStats::new();
        assert_eq!(stats.accepted, 0);
        assert_eq!(stats.rejected, 0);
        assert_eq!(stats.lookups, 0);
        assert_eq!(stats.total(), 0);
    }

    #[test]
    fn test_stats_display() {
        let mut stats = ServerStats::new();
        stats.accepted = 3;
        stats.rejected = 1;

        let display = format!("{}", stats);
        assert!(display.contains("Accepted: 3"));
        assert!(display.contains("Rejected: 1"));
        assert!(display.contains("Lookups: 0"));
    }

    #[test]
    fn test_tracker_operations() {
        let tracker = StatsTracker::new();
        let shared = tracker.clone();

        tracker.add_accepted();
        shared.add_accepted();
        shared.add_rejected();
        tracker.add_lookup();

        let stats = tracker.get_stats();
        assert_eq!(stats.accepted, 2);
        assert_eq!(stats.rejected, 1);
        assert_eq!(stats.lookups, 1);
        assert_eq!(stats.total(), 4);

        tracker.reset();
        assert_eq!(shared.get_stats().total(), 0);
    }
}
