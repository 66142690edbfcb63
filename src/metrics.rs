//! Sink metrics
//!
//! Lock-free counters shared between the facade, the worker, and the
//! maintenance tasks. `snapshot()` gives a point-in-time copy; the final
//! snapshot is returned from `close`.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for the SQLite sink
#[derive(Debug, Default)]
pub struct SqliteSinkMetrics {
    /// Events offered to `emit` (past the level filter)
    pub events_received: AtomicU64,

    /// Events dropped because the buffer was full
    pub events_dropped: AtomicU64,

    /// Batches committed
    pub batches_written: AtomicU64,

    /// Events committed (sum of batch sizes)
    pub events_written: AtomicU64,

    /// Batches lost to write errors (including full-database drops)
    pub write_errors: AtomicU64,

    /// Rollover rotations performed
    pub rollovers: AtomicU64,

    /// Retention sweeps completed
    pub retention_sweeps: AtomicU64,

    /// Rows removed by retention sweeps
    pub rows_expired: AtomicU64,
}

impl SqliteSinkMetrics {
    pub const fn new() -> Self {
        Self {
            events_received: AtomicU64::new(0),
            events_dropped: AtomicU64::new(0),
            batches_written: AtomicU64::new(0),
            events_written: AtomicU64::new(0),
            write_errors: AtomicU64::new(0),
            rollovers: AtomicU64::new(0),
            retention_sweeps: AtomicU64::new(0),
            rows_expired: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn record_received(&self) {
        self.events_received.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_dropped(&self) {
        self.events_dropped.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_batch_written(&self, events: u64) {
        self.batches_written.fetch_add(1, Ordering::Relaxed);
        self.events_written.fetch_add(events, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_write_error(&self) {
        self.write_errors.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_rollover(&self) {
        self.rollovers.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_retention_sweep(&self, rows_expired: u64) {
        self.retention_sweeps.fetch_add(1, Ordering::Relaxed);
        self.rows_expired.fetch_add(rows_expired, Ordering::Relaxed);
    }

    /// Get a snapshot of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            events_received: self.events_received.load(Ordering::Relaxed),
            events_dropped: self.events_dropped.load(Ordering::Relaxed),
            batches_written: self.batches_written.load(Ordering::Relaxed),
            events_written: self.events_written.load(Ordering::Relaxed),
            write_errors: self.write_errors.load(Ordering::Relaxed),
            rollovers: self.rollovers.load(Ordering::Relaxed),
            retention_sweeps: self.retention_sweeps.load(Ordering::Relaxed),
            rows_expired: self.rows_expired.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time snapshot of sink metrics
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsSnapshot {
    pub events_received: u64,
    pub events_dropped: u64,
    pub batches_written: u64,
    pub events_written: u64,
    pub write_errors: u64,
    pub rollovers: u64,
    pub retention_sweeps: u64,
    pub rows_expired: u64,
}

#[cfg(test)]
#[path = "metrics_test.rs"]
mod metrics_test;
