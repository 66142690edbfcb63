//! Sink facade
//!
//! `SqliteSink` is what the host logging pipeline holds: a non-blocking
//! `emit` on the front, a draining `close` on the back, and the worker and
//! retention tasks in between. Shutdown is a one-way state machine,
//! `Running → Draining → Closed`: the first `close` stops admission and the
//! worker owns the final drain.
//!
//! # Example
//!
//! ```ignore
//! use sqlog::{Level, LogEvent, SqliteSink, SqliteSinkConfig};
//!
//! let sink = SqliteSink::open(SqliteSinkConfig::new("logs/app.db"))?;
//!
//! sink.emit(LogEvent::now(Level::Information, "service started"));
//!
//! // ... later, at shutdown:
//! let stats = sink.close().await;
//! println!("persisted {} events", stats.events_written);
//! ```

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::Mutex as AsyncMutex;
use tokio::task::JoinHandle;

use crate::config::SqliteSinkConfig;
use crate::error::SqliteSinkError;
use crate::event::{Level, LogEvent};
use crate::maintenance::RetentionSweeper;
use crate::metrics::{MetricsSnapshot, SqliteSinkMetrics};
use crate::throttle::LogThrottle;
use crate::worker::SinkWorker;
use crate::writer::SqliteWriter;

const STATE_RUNNING: u8 = 0;
const STATE_DRAINING: u8 = 1;
const STATE_CLOSED: u8 = 2;

/// A durable, batched SQLite sink for structured log events.
///
/// One instance owns one database file. Construction bootstraps the schema
/// and spawns the worker (and, when retention is configured, the sweeper);
/// `open` must therefore be called within a Tokio runtime.
pub struct SqliteSink {
    /// Taken at shutdown; a missing sender means admission is over
    sender: RwLock<Option<mpsc::Sender<LogEvent>>>,

    /// `Running → Draining → Closed`, transitions only forward
    state: AtomicU8,

    min_level: Level,

    /// Keeps buffer-overflow warnings to one line per interval
    overflow: LogThrottle,

    metrics: Arc<SqliteSinkMetrics>,

    worker: AsyncMutex<Option<JoinHandle<()>>>,
    retention: Mutex<Option<JoinHandle<()>>>,
}

impl SqliteSink {
    /// Validate the configuration, bootstrap the database, and start the
    /// pipeline.
    ///
    /// # Errors
    ///
    /// Returns an error when the configuration is invalid or the database
    /// cannot be opened and bootstrapped. These are the only errors the sink
    /// ever surfaces.
    pub fn open(config: SqliteSinkConfig) -> Result<Self, SqliteSinkError> {
        config.validate()?;

        let metrics = Arc::new(SqliteSinkMetrics::new());
        let writer = Arc::new(SqliteWriter::open(&config, Arc::clone(&metrics))?);
        let (sender, receiver) = mpsc::channel(config.max_buffer_size);

        tracing::info!(
            db = %writer.db_path().display(),
            table = %config.table_name,
            batch_size = config.batch_size,
            "sqlite sink starting"
        );

        let worker = SinkWorker::new(receiver, Arc::clone(&writer), &config, Arc::clone(&metrics));
        let worker_handle = tokio::spawn(worker.run());

        let retention_handle = config.retention_period.map(|period| {
            let sweeper = RetentionSweeper::new(
                Arc::clone(&writer),
                period,
                config.retention_check_interval,
                Arc::clone(&metrics),
            );
            tokio::spawn(sweeper.run())
        });

        Ok(Self {
            sender: RwLock::new(Some(sender)),
            state: AtomicU8::new(STATE_RUNNING),
            min_level: config.min_level,
            overflow: LogThrottle::default(),
            metrics,
            worker: AsyncMutex::new(Some(worker_handle)),
            retention: Mutex::new(retention_handle),
        })
    }

    /// Offer an event to the sink. Non-blocking, best-effort.
    ///
    /// Events below the configured minimum level are discarded. When the
    /// buffer is full the event is dropped and counted; nothing on this path
    /// ever returns an error to the producer.
    pub fn emit(&self, event: LogEvent) {
        if self.state.load(Ordering::Acquire) != STATE_RUNNING {
            return;
        }
        if event.level() < self.min_level {
            return;
        }

        let guard = self.sender.read();
        let Some(sender) = guard.as_ref() else {
            return;
        };

        self.metrics.record_received();
        match sender.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                self.metrics.record_dropped();
                if let Some(suppressed) = self.overflow.admit() {
                    tracing::warn!(suppressed, "event buffer full, dropping events");
                }
            }
            // Racing a concurrent close; the event is dropped like any
            // other post-shutdown emit.
            Err(TrySendError::Closed(_)) => {}
        }
    }

    /// Drain the buffer, stop the pipeline, and close the database.
    ///
    /// Idempotent and safe to call concurrently; every caller observes the
    /// drain completing before the method returns. Returns the final metrics
    /// snapshot.
    pub async fn close(&self) -> MetricsSnapshot {
        if self
            .state
            .compare_exchange(
                STATE_RUNNING,
                STATE_DRAINING,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
        {
            // Dropping the sender closes the channel; the worker drains what
            // the buffer still holds and flushes the final batch.
            *self.sender.write() = None;
        }

        if let Some(handle) = self.worker.lock().await.take() {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "sink worker task failed");
            }
        }

        // The sweeper holds no pending work; cancelling it mid-sleep is safe.
        // Awaiting the aborted handle makes the guard drop (and with it the
        // connection close) happen before close returns.
        let retention = self.retention.lock().take();
        if let Some(handle) = retention {
            handle.abort();
            let _ = handle.await;
        }

        self.state.store(STATE_CLOSED, Ordering::Release);
        tracing::info!("sqlite sink closed");
        self.metrics.snapshot()
    }

    /// Current metrics snapshot.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

impl Drop for SqliteSink {
    /// Best-effort: a sink dropped without `close` stops admission and lets
    /// the worker drain in the background. Callers that need the drain
    /// completed must use `close`.
    fn drop(&mut self) {
        if self.state.load(Ordering::Acquire) == STATE_RUNNING {
            *self.sender.write() = None;
            tracing::debug!("sqlite sink dropped without close, draining in background");
        }
    }
}

#[cfg(test)]
#[path = "sink_test.rs"]
mod sink_test;
