//! Batching worker
//!
//! One task drains the bounded buffer and decides when a batch goes to the
//! writer: when the pending list reaches `batch_size`, or when a full
//! `flush_interval` passes with at least one pending event. The writer runs
//! inline on this task, so triggers are coalesced by construction: a second
//! trigger cannot fire while a transaction is in flight.
//!
//! Channel closure is the drain signal: `recv()` hands over every buffered
//! event before returning `None`, and the final (possibly undersized) batch
//! is dispatched before the task exits.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::config::SqliteSinkConfig;
use crate::event::LogEvent;
use crate::metrics::SqliteSinkMetrics;
use crate::writer::SqliteWriter;

pub(crate) struct SinkWorker {
    receiver: mpsc::Receiver<LogEvent>,
    writer: Arc<SqliteWriter>,
    batch_size: usize,
    flush_interval: Duration,
    pending: Vec<LogEvent>,
    metrics: Arc<SqliteSinkMetrics>,
}

impl SinkWorker {
    pub(crate) fn new(
        receiver: mpsc::Receiver<LogEvent>,
        writer: Arc<SqliteWriter>,
        config: &SqliteSinkConfig,
        metrics: Arc<SqliteSinkMetrics>,
    ) -> Self {
        Self {
            receiver,
            writer,
            batch_size: config.batch_size,
            flush_interval: config.flush_interval,
            pending: Vec::with_capacity(config.batch_size),
            metrics,
        }
    }

    pub(crate) async fn run(mut self) {
        tracing::debug!(
            batch_size = self.batch_size,
            flush_interval_ms = self.flush_interval.as_millis() as u64,
            "sqlite sink worker started"
        );

        let mut ticker = tokio::time::interval(self.flush_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // An interval's first tick completes immediately; consume it so the
        // time trigger measures a full interval of inactivity.
        ticker.tick().await;

        loop {
            tokio::select! {
                maybe_event = self.receiver.recv() => {
                    match maybe_event {
                        Some(event) => {
                            self.pending.push(event);
                            if self.pending.len() >= self.batch_size {
                                self.flush();
                                // A dispatch restarts the inactivity clock.
                                ticker.reset();
                            }
                        }
                        None => break,
                    }
                }
                _ = ticker.tick() => {
                    if !self.pending.is_empty() {
                        self.flush();
                    }
                }
            }
        }

        // Drain: flush whatever the closed channel left pending.
        self.flush();

        let snapshot = self.metrics.snapshot();
        tracing::debug!(
            batches = snapshot.batches_written,
            events = snapshot.events_written,
            errors = snapshot.write_errors,
            "sqlite sink worker stopped"
        );
    }

    fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        self.writer.write_batch(&self.pending);
        self.pending.clear();
    }
}
