//! sqlog - Durable, batched SQLite sink for structured log events
//!
//! Accepts structured log records from a host logging pipeline and persists
//! them into a single-file SQLite database, batching inserts to amortize
//! commit cost and keeping the file bounded over time with age-based
//! retention and size-based rollover.
//!
//! # Architecture
//!
//! ```text
//! [emit()] --try_send--> [bounded channel] --> [worker task] --> [SQLite file]
//!                                                  ▲                  ▲
//!                                                  │                  │
//!                                            [flush timer]      [retention task]
//! ```
//!
//! Producers never block on disk I/O: `emit` is a non-blocking `try_send`
//! into a bounded channel, and a single worker task owns all database work.
//! A full buffer drops new events (counted and reported); a full database
//! triggers rollover or a dropped batch, per configuration. Write-path
//! failures never reach producers, they go to the `tracing` diagnostic
//! channel.
//!
//! # Example
//!
//! ```ignore
//! use sqlog::{Level, LogEvent, SqliteSink, SqliteSinkConfig};
//! use std::time::Duration;
//!
//! let config = SqliteSinkConfig::new("logs/app.db")
//!     .with_utc_timestamps()
//!     .with_batch_size(250)
//!     .with_retention(Duration::from_secs(7 * 24 * 3600));
//! let sink = SqliteSink::open(config)?;
//!
//! sink.emit(
//!     LogEvent::now(Level::Warning, "disk usage at {percent}%")
//!         .with_rendered("disk usage at 93%")
//!         .with_property("percent", 93),
//! );
//!
//! let stats = sink.close().await;
//! ```

/// Sink configuration: defaults, builders, validation
pub mod config;

/// The error surfaced at construction
pub mod error;

/// Log event model: levels, events, builders
pub mod event;

/// Structured property values and the `Properties` column encoder
pub mod properties;

/// Atomic counters and snapshots
pub mod metrics;

/// The facade: `open`, `emit`, `close`
mod sink;

/// Retention scheduling
mod maintenance;

/// Rate-limited warnings
mod throttle;

/// Batching loop
mod worker;

/// Connection ownership, schema bootstrap, transactional inserts, rollover
mod writer;

pub use config::SqliteSinkConfig;
pub use error::SqliteSinkError;
pub use event::{Level, LogEvent};
pub use metrics::{MetricsSnapshot, SqliteSinkMetrics};
pub use properties::{PropertyValue, ScalarValue, StructuredValue};
pub use sink::SqliteSink;
