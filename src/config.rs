//! Sink configuration
//!
//! Plain struct with builder-style setters; validated once at `open`.
//! Validation failures are fatal to construction: a misconfigured sink must
//! be caught at startup, not discovered on the write path.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::SqliteSinkError;
use crate::event::Level;

// =============================================================================
// Defaults and limits
// =============================================================================

/// Default table used in `CREATE TABLE` and all DML
pub const DEFAULT_TABLE_NAME: &str = "Logs";

/// Default size-trigger threshold for a batch
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Default hard cap on queued events
pub const DEFAULT_MAX_BUFFER_SIZE: usize = 100_000;

/// Default time-trigger period
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(10);

/// Floor on the time-trigger period, to avoid busy-flushing
pub const MIN_FLUSH_INTERVAL: Duration = Duration::from_millis(100);

/// Default database size cap in megabytes
pub const DEFAULT_MAX_DB_MB: u64 = 10;

/// Largest accepted database size cap in megabytes (20 GB)
pub const MAX_DB_MB_LIMIT: u64 = 20_480;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for [`SqliteSink`](crate::SqliteSink)
#[derive(Debug, Clone)]
pub struct SqliteSinkConfig {
    /// Database file path; relative paths resolve against the process
    /// working directory, parent directories are created at open
    pub db_path: PathBuf,

    /// Table for `CREATE TABLE` and all DML
    pub table_name: String,

    /// Convert timestamps (inserts and retention cut-offs) to UTC before
    /// formatting; otherwise the event's own offset is kept
    pub store_timestamp_in_utc: bool,

    /// Events below this level are discarded in `emit`
    pub min_level: Level,

    /// Size-trigger threshold for a batch
    pub batch_size: usize,

    /// Hard cap on queued events (drop-new beyond it)
    pub max_buffer_size: usize,

    /// Time-trigger period for undersized batches
    pub flush_interval: Duration,

    /// Delete rows older than this; `None` disables retention.
    /// Floored to 30 minutes when set.
    pub retention_period: Option<Duration>,

    /// Retention sweep period; floored to 15 minutes and rounded down to a
    /// multiple of 15 minutes. `None` uses the 15-minute floor when
    /// retention is enabled.
    pub retention_check_interval: Option<Duration>,

    /// Database size cap in megabytes, enforced via `max_page_count`
    pub max_db_mb: u64,

    /// On a full database, rotate the file aside and retry the batch once;
    /// when disabled the offending batch is dropped
    pub roll_over: bool,
}

impl SqliteSinkConfig {
    /// Create a configuration with defaults for everything but the path.
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            table_name: DEFAULT_TABLE_NAME.into(),
            store_timestamp_in_utc: false,
            min_level: Level::Verbose,
            batch_size: DEFAULT_BATCH_SIZE,
            max_buffer_size: DEFAULT_MAX_BUFFER_SIZE,
            flush_interval: DEFAULT_FLUSH_INTERVAL,
            retention_period: None,
            retention_check_interval: None,
            max_db_mb: DEFAULT_MAX_DB_MB,
            roll_over: true,
        }
    }

    /// Set the table name
    pub fn with_table_name(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = table_name.into();
        self
    }

    /// Store timestamps in UTC instead of the event's own offset
    pub fn with_utc_timestamps(mut self) -> Self {
        self.store_timestamp_in_utc = true;
        self
    }

    /// Set the minimum level accepted by `emit`
    pub fn with_min_level(mut self, level: Level) -> Self {
        self.min_level = level;
        self
    }

    /// Set the batch size trigger
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Set the buffered-event cap
    pub fn with_max_buffer_size(mut self, max_buffer_size: usize) -> Self {
        self.max_buffer_size = max_buffer_size;
        self
    }

    /// Set the time-trigger period
    pub fn with_flush_interval(mut self, flush_interval: Duration) -> Self {
        self.flush_interval = flush_interval;
        self
    }

    /// Enable age-based retention
    pub fn with_retention(mut self, period: Duration) -> Self {
        self.retention_period = Some(period);
        self
    }

    /// Set the retention sweep period
    pub fn with_retention_check_interval(mut self, interval: Duration) -> Self {
        self.retention_check_interval = Some(interval);
        self
    }

    /// Set the database size cap in megabytes
    pub fn with_max_db_size_mb(mut self, max_db_mb: u64) -> Self {
        self.max_db_mb = max_db_mb;
        self
    }

    /// Drop batches instead of rotating when the database is full
    pub fn without_rollover(mut self) -> Self {
        self.roll_over = false;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), SqliteSinkError> {
        if !is_valid_identifier(&self.table_name) {
            return Err(SqliteSinkError::config(format!(
                "table name {:?} is not a valid SQL identifier",
                self.table_name
            )));
        }
        if self.batch_size == 0 {
            return Err(SqliteSinkError::config("batch_size must be at least 1"));
        }
        if self.max_buffer_size == 0 {
            return Err(SqliteSinkError::config("max_buffer_size must be at least 1"));
        }
        if self.batch_size > self.max_buffer_size {
            return Err(SqliteSinkError::config(format!(
                "batch_size ({}) cannot exceed max_buffer_size ({})",
                self.batch_size, self.max_buffer_size
            )));
        }
        if self.flush_interval < MIN_FLUSH_INTERVAL {
            return Err(SqliteSinkError::config(format!(
                "flush_interval must be at least {:?}",
                MIN_FLUSH_INTERVAL
            )));
        }
        if self.max_db_mb == 0 || self.max_db_mb > MAX_DB_MB_LIMIT {
            return Err(SqliteSinkError::config(format!(
                "max_db_mb must be between 1 and {}",
                MAX_DB_MB_LIMIT
            )));
        }
        Ok(())
    }

    /// Resolve a relative database path against the process working
    /// directory.
    pub(crate) fn resolved_db_path(&self) -> PathBuf {
        if self.db_path.is_absolute() {
            self.db_path.clone()
        } else {
            std::env::current_dir()
                .map(|base| base.join(&self.db_path))
                .unwrap_or_else(|_| self.db_path.clone())
        }
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`; the table name lands in SQL verbatim.
fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
