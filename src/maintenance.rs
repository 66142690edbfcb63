//! Retention scheduling
//!
//! A separate task deletes aged-out rows on a coarse schedule. The schedule
//! is deliberately blunt: sweeps run at most every 15 minutes, and the
//! cut-off never looks back less than 30 minutes. The sweeper reaches the
//! connection only through the writer guard, so a sweep can never interleave
//! with a batch insert.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;

use crate::metrics::SqliteSinkMetrics;
use crate::writer::SqliteWriter;

/// Minimum age a row must reach before retention may delete it
pub(crate) const RETENTION_PERIOD_FLOOR: Duration = Duration::from_secs(30 * 60);

/// Sweep-schedule quantum: intervals are floored to this and rounded down
/// to a multiple of it
pub(crate) const RETENTION_CHECK_QUANTUM: Duration = Duration::from_secs(15 * 60);

/// `max(configured, 30 min)`
pub(crate) fn effective_retention_period(configured: Duration) -> Duration {
    configured.max(RETENTION_PERIOD_FLOOR)
}

/// `max(configured, 15 min)` rounded down to a multiple of 15 minutes.
pub(crate) fn effective_check_interval(configured: Duration) -> Duration {
    let quantum = RETENTION_CHECK_QUANTUM.as_secs();
    let secs = configured.as_secs().max(quantum);
    Duration::from_secs(secs - secs % quantum)
}

pub(crate) struct RetentionSweeper {
    writer: Arc<SqliteWriter>,
    period: Duration,
    check_interval: Duration,
    metrics: Arc<SqliteSinkMetrics>,
}

impl RetentionSweeper {
    /// Floors and rounding are applied here; callers pass the configured
    /// values through unchanged.
    pub(crate) fn new(
        writer: Arc<SqliteWriter>,
        configured_period: Duration,
        configured_check_interval: Option<Duration>,
        metrics: Arc<SqliteSinkMetrics>,
    ) -> Self {
        Self {
            writer,
            period: effective_retention_period(configured_period),
            check_interval: effective_check_interval(
                configured_check_interval.unwrap_or(RETENTION_CHECK_QUANTUM),
            ),
            metrics,
        }
    }

    /// Runs until aborted at shutdown.
    pub(crate) async fn run(self) {
        tracing::debug!(
            period_secs = self.period.as_secs(),
            check_interval_secs = self.check_interval.as_secs(),
            "retention sweeper started"
        );

        let mut ticker = tokio::time::interval(self.check_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // Swallow the immediate first tick; the first sweep happens one full
        // interval after startup.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            self.sweep();
        }
    }

    /// One deletion pass. Errors are logged and the next sweep stays on
    /// schedule.
    pub(crate) fn sweep(&self) {
        match self.writer.apply_retention(self.period) {
            Ok(deleted) => {
                self.metrics.record_retention_sweep(deleted as u64);
                if deleted > 0 {
                    tracing::debug!(deleted, "retention sweep removed expired rows");
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "retention sweep failed");
            }
        }
    }
}

#[cfg(test)]
#[path = "maintenance_test.rs"]
mod maintenance_test;
