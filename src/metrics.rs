// Performance metrics module
//
// Lightweight counters for monitoring the state core.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Runtime counters for the state core.
///
/// Uses atomic operations for thread-safe tracking without locks. Counters
/// accumulate over the session and can be logged periodically or on shutdown.
#[derive(Debug)]
pub struct Metrics {
    /// Number of state updates applied through the dispatch path
    pub state_updates: AtomicU64,

    /// Number of state change broadcasts sent
    pub state_broadcasts: AtomicU64,

    /// Number of broadcasts with no live subscriber
    pub state_broadcast_errors: AtomicU64,

    /// Fetch cycles started
    pub fetches_started: AtomicU64,

    /// Fetch cycles that resolved with data
    pub fetches_succeeded: AtomicU64,

    /// Fetch cycles that rejected
    pub fetches_failed: AtomicU64,

    /// Resolutions dropped because a newer fetch superseded them
    pub stale_resolutions_dropped: AtomicU64,

    /// Preference writes that reached the durable backend
    pub store_writes: AtomicU64,

    /// Preference writes suppressed as first observations
    pub store_writes_suppressed: AtomicU64,

    /// Session start time
    start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            state_updates: AtomicU64::new(0),
            state_broadcasts: AtomicU64::new(0),
            state_broadcast_errors: AtomicU64::new(0),
            fetches_started: AtomicU64::new(0),
            fetches_succeeded: AtomicU64::new(0),
            fetches_failed: AtomicU64::new(0),
            stale_resolutions_dropped: AtomicU64::new(0),
            store_writes: AtomicU64::new(0),
            store_writes_suppressed: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_state_update(&self) {
        self.state_updates.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_broadcast(&self) {
        self.state_broadcasts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_broadcast_error(&self) {
        self.state_broadcast_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fetch_started(&self) {
        self.fetches_started.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fetch_succeeded(&self) {
        self.fetches_succeeded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fetch_failed(&self) {
        self.fetches_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_stale_resolution(&self) {
        self.stale_resolutions_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_store_write(&self, persisted: bool) {
        if persisted {
            self.store_writes.fetch_add(1, Ordering::Relaxed);
        } else {
            self.store_writes_suppressed.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Time since the metrics were created.
    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Log a one-line summary of all counters.
    pub fn log_summary(&self) {
        tracing::info!(
            "Metrics: updates={}, broadcasts={} (errors={}), fetches={}/{}ok/{}err, stale={}, store_writes={} (suppressed={}), uptime={:?}",
            self.state_updates.load(Ordering::Relaxed),
            self.state_broadcasts.load(Ordering::Relaxed),
            self.state_broadcast_errors.load(Ordering::Relaxed),
            self.fetches_started.load(Ordering::Relaxed),
            self.fetches_succeeded.load(Ordering::Relaxed),
            self.fetches_failed.load(Ordering::Relaxed),
            self.stale_resolutions_dropped.load(Ordering::Relaxed),
            self.store_writes.load(Ordering::Relaxed),
            self.store_writes_suppressed.load(Ordering::Relaxed),
            self.uptime(),
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_start_at_zero() {
        let metrics = Metrics::new();

        assert_eq!(metrics.state_updates.load(Ordering::Relaxed), 0);
        assert_eq!(metrics.fetches_started.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_record_and_read_back() {
        let metrics = Metrics::new();

        metrics.record_state_update();
        metrics.record_state_update();
        metrics.record_fetch_started();
        metrics.record_fetch_succeeded();
        metrics.record_store_write(true);
        metrics.record_store_write(false);

        assert_eq!(metrics.state_updates.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.fetches_started.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.fetches_succeeded.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.store_writes.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.store_writes_suppressed.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_uptime_advances() {
        let metrics = Metrics::new();
        std::thread::sleep(Duration::from_millis(5));

        assert!(metrics.uptime() >= Duration::from_millis(5));
    }
}
