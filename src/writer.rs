//! Synchronous SQLite writer
//!
//! Owns the database connection behind the writer guard and performs all
//! database work: connection configuration, schema bootstrap, transactional
//! batch inserts, the full-database rollover path, and retention deletes.
//! Every call runs to completion while the guard is held, so batch writes,
//! retention sweeps and rollover can never interleave on the connection.
//!
//! A batch is one transaction: either every row of the batch is committed or
//! none are. Write-path errors never propagate to producers; they are
//! reported on the diagnostic channel and the batch is lost.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, Local, Utc};
use parking_lot::Mutex;
use rusqlite::{named_params, Connection};

use crate::config::SqliteSinkConfig;
use crate::error::SqliteSinkError;
use crate::event::LogEvent;
use crate::metrics::SqliteSinkMetrics;
use crate::properties::encode_properties;

/// SQLite page size, fixed at open
pub(crate) const PAGE_SIZE: u64 = 4096;

/// Connection page cache, in pages
const CACHE_SIZE_PAGES: u64 = 500;

const BYTES_PER_MB: u64 = 1_048_576;

/// Stored timestamp pattern: seconds precision, no zone suffix
pub(crate) const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Writer for one database file.
///
/// The `Mutex<Connection>` is the writer guard from the sink's concurrency
/// model: the worker task and the retention task are its only users, and
/// each sink instance owns exactly one.
pub(crate) struct SqliteWriter {
    conn: Mutex<Connection>,
    db_path: PathBuf,
    table_name: String,
    insert_sql: String,
    store_timestamp_in_utc: bool,
    roll_over: bool,
    metrics: Arc<SqliteSinkMetrics>,
}

impl SqliteWriter {
    /// Open (creating if needed) the database and bootstrap the log table.
    ///
    /// Fatal on any failure: construction is the only place where errors
    /// reach the caller.
    pub(crate) fn open(
        config: &SqliteSinkConfig,
        metrics: Arc<SqliteSinkMetrics>,
    ) -> Result<Self, SqliteSinkError> {
        let db_path = config.resolved_db_path();
        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(&db_path).map_err(SqliteSinkError::bootstrap)?;
        configure_connection(&conn, max_page_count(config.max_db_mb))
            .map_err(SqliteSinkError::bootstrap)?;
        bootstrap_schema(&conn, &config.table_name).map_err(SqliteSinkError::bootstrap)?;

        let insert_sql = format!(
            "INSERT INTO {} (Timestamp, Level, Exception, RenderedMessage, Properties) \
             VALUES (@timeStamp, @level, @exception, @renderedMessage, @properties)",
            config.table_name
        );

        Ok(Self {
            conn: Mutex::new(conn),
            db_path,
            table_name: config.table_name.clone(),
            insert_sql,
            store_timestamp_in_utc: config.store_timestamp_in_utc,
            roll_over: config.roll_over,
            metrics,
        })
    }

    pub(crate) fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Write one batch in one transaction.
    ///
    /// Failure policy: `SQLITE_FULL` goes to the rollover path; anything
    /// else loses the batch and keeps the pipeline alive.
    pub(crate) fn write_batch(&self, batch: &[LogEvent]) {
        if batch.is_empty() {
            return;
        }
        let mut conn = self.conn.lock();
        match self.insert_batch(&mut conn, batch) {
            Ok(()) => {
                self.metrics.record_batch_written(batch.len() as u64);
                tracing::debug!(events = batch.len(), "batch committed");
            }
            Err(e) if is_database_full(&e) => self.handle_full(&mut conn, batch),
            Err(e) => {
                self.metrics.record_write_error();
                tracing::error!(error = %e, events = batch.len(), "batch insert failed, events lost");
            }
        }
    }

    fn insert_batch(&self, conn: &mut Connection, batch: &[LogEvent]) -> rusqlite::Result<()> {
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(&self.insert_sql)?;
            for event in batch {
                stmt.execute(named_params! {
                    "@timeStamp": self.format_timestamp(event.timestamp()),
                    "@level": event.level().as_str(),
                    "@exception": event.exception_text(),
                    "@renderedMessage": event.rendered_message(),
                    "@properties": encode_properties(event.properties()),
                })?;
            }
        }
        tx.commit()
    }

    /// The database hit its page cap mid-batch (the transaction already
    /// rolled back). Rotate-and-retry once, or drop.
    fn handle_full(&self, conn: &mut Connection, batch: &[LogEvent]) {
        if !self.roll_over {
            self.metrics.record_write_error();
            tracing::warn!(
                events = batch.len(),
                "database reached its size cap, dropping batch (rollover disabled)"
            );
            return;
        }

        match self.roll_over_file(conn) {
            Ok(archive) => {
                self.metrics.record_rollover();
                tracing::info!(archive = %archive.display(), "database rolled over");
                match self.insert_batch(conn, batch) {
                    Ok(()) => {
                        self.metrics.record_batch_written(batch.len() as u64);
                        tracing::debug!(events = batch.len(), "batch committed after rollover");
                    }
                    Err(e) => {
                        self.metrics.record_write_error();
                        tracing::error!(
                            error = %e,
                            events = batch.len(),
                            "batch insert failed after rollover, events lost"
                        );
                    }
                }
            }
            Err(e) => {
                self.metrics.record_write_error();
                tracing::error!(error = %e, events = batch.len(), "rollover failed, dropping batch");
            }
        }
    }

    /// Copy the live file aside and empty the table in place. The connection
    /// and the file identity are preserved.
    fn roll_over_file(&self, conn: &Connection) -> Result<PathBuf, SqliteSinkError> {
        let archive = rollover_path(&self.db_path, Local::now());
        fs::copy(&self.db_path, &archive)?;
        conn.execute(&format!("DELETE FROM {}", self.table_name), [])?;
        Ok(archive)
    }

    /// Delete rows older than `period`. Returns the number of rows removed.
    pub(crate) fn apply_retention(&self, period: Duration) -> rusqlite::Result<usize> {
        let cutoff = self.retention_cutoff(period);
        let conn = self.conn.lock();
        conn.execute(
            &format!(
                "DELETE FROM {} WHERE Timestamp < @cutoff",
                self.table_name
            ),
            named_params! { "@cutoff": cutoff },
        )
    }

    /// The cut-off must be formatted exactly like insert timestamps (same
    /// UTC/local choice, same pattern), the comparison being textual.
    fn retention_cutoff(&self, period: Duration) -> String {
        let now: DateTime<FixedOffset> = if self.store_timestamp_in_utc {
            Utc::now().fixed_offset()
        } else {
            Local::now().fixed_offset()
        };
        let cutoff = chrono::Duration::from_std(period)
            .ok()
            .and_then(|age| now.checked_sub_signed(age))
            .unwrap_or_else(|| DateTime::<Utc>::MIN_UTC.fixed_offset());
        cutoff.format(TIMESTAMP_FORMAT).to_string()
    }

    fn format_timestamp(&self, timestamp: DateTime<FixedOffset>) -> String {
        if self.store_timestamp_in_utc {
            timestamp.with_timezone(&Utc).format(TIMESTAMP_FORMAT).to_string()
        } else {
            timestamp.format(TIMESTAMP_FORMAT).to_string()
        }
    }
}

fn max_page_count(max_db_mb: u64) -> u64 {
    max_db_mb * BYTES_PER_MB / PAGE_SIZE
}

/// Throughput-oriented connection setup. In-memory journaling trades
/// crash-atomicity of individual transactions for speed; the page cap is
/// what surfaces `SQLITE_FULL` to the rollover path.
fn configure_connection(conn: &Connection, max_page_count: u64) -> rusqlite::Result<()> {
    // Page size only takes effect before the first table is created.
    conn.pragma_update(None, "page_size", PAGE_SIZE as i64)?;
    conn.pragma_update(None, "journal_mode", "MEMORY")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    conn.pragma_update(None, "cache_size", CACHE_SIZE_PAGES as i64)?;
    conn.pragma_update(None, "max_page_count", max_page_count as i64)?;
    Ok(())
}

/// Idempotent: an existing table with at least these columns is accepted.
fn bootstrap_schema(conn: &Connection, table_name: &str) -> rusqlite::Result<()> {
    conn.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS {table_name} (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            Timestamp TEXT NOT NULL,
            Level VARCHAR(10) NOT NULL,
            Exception TEXT NOT NULL,
            RenderedMessage TEXT NOT NULL,
            Properties TEXT NOT NULL
        )"
    ))
}

fn is_database_full(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::DiskFull
    )
}

/// Archive sibling: `<stem>-<yyyyMMdd_hhmmss.ff><ext>`, local time.
/// The 12-hour clock is kept for compatibility with existing archives.
pub(crate) fn rollover_path(db_path: &Path, now: DateTime<Local>) -> PathBuf {
    let stem = db_path.file_stem().and_then(|s| s.to_str()).unwrap_or("log");
    let ext = db_path
        .extension()
        .and_then(|s| s.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default();
    let hundredths = now.timestamp_subsec_millis() / 10;
    db_path.with_file_name(format!(
        "{stem}-{}.{:02}{ext}",
        now.format("%Y%m%d_%I%M%S"),
        hundredths
    ))
}

#[cfg(test)]
#[path = "writer_test.rs"]
mod writer_test;
