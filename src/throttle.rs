//! Rate-limited warning helper
//!
//! A full buffer can reject tens of thousands of events per second; logging
//! each rejection would flood the diagnostic channel. The throttle admits at
//! most one log line per interval and hands the caller the number of
//! suppressed occurrences since the last admitted one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Minimum interval between admitted log lines
pub(crate) const DEFAULT_THROTTLE_INTERVAL: Duration = Duration::from_secs(10);

pub(crate) struct LogThrottle {
    min_interval: Duration,
    last_log_time: Mutex<Option<Instant>>,
    suppressed: AtomicU64,
}

impl LogThrottle {
    pub(crate) fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_log_time: Mutex::new(None),
            suppressed: AtomicU64::new(0),
        }
    }

    /// Record an occurrence. Returns `Some(suppressed)` when the caller
    /// should log, with the count of occurrences swallowed since the last
    /// admitted line.
    pub(crate) fn admit(&self) -> Option<u64> {
        let mut last = self.last_log_time.lock();
        let now = Instant::now();
        let due = match *last {
            None => true,
            Some(at) => now.duration_since(at) >= self.min_interval,
        };
        if due {
            *last = Some(now);
            Some(self.suppressed.swap(0, Ordering::Relaxed))
        } else {
            self.suppressed.fetch_add(1, Ordering::Relaxed);
            None
        }
    }
}

impl Default for LogThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_THROTTLE_INTERVAL)
    }
}
