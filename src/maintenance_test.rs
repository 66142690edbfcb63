use super::*;
use crate::config::SqliteSinkConfig;
use crate::event::{Level, LogEvent};
use crate::writer::SqliteWriter;
use chrono::Utc;
use rusqlite::Connection;
use tempfile::TempDir;

// =============================================================================
// Schedule arithmetic
// =============================================================================

#[test]
fn test_retention_period_floor_is_thirty_minutes() {
    assert_eq!(
        effective_retention_period(Duration::from_secs(60)),
        RETENTION_PERIOD_FLOOR
    );
    assert_eq!(
        effective_retention_period(RETENTION_PERIOD_FLOOR),
        RETENTION_PERIOD_FLOOR
    );
    assert_eq!(
        effective_retention_period(Duration::from_secs(7200)),
        Duration::from_secs(7200)
    );
}

#[test]
fn test_check_interval_floors_to_fifteen_minutes() {
    assert_eq!(
        effective_check_interval(Duration::ZERO),
        RETENTION_CHECK_QUANTUM
    );
    assert_eq!(
        effective_check_interval(Duration::from_secs(10 * 60)),
        RETENTION_CHECK_QUANTUM
    );
    assert_eq!(
        effective_check_interval(RETENTION_CHECK_QUANTUM),
        RETENTION_CHECK_QUANTUM
    );
}

#[test]
fn test_check_interval_rounds_down_to_quantum_multiples() {
    // 29 min -> 15 min, 40 min -> 30 min, 61 min -> 60 min, 45 min stays.
    assert_eq!(
        effective_check_interval(Duration::from_secs(29 * 60)),
        Duration::from_secs(15 * 60)
    );
    assert_eq!(
        effective_check_interval(Duration::from_secs(40 * 60)),
        Duration::from_secs(30 * 60)
    );
    assert_eq!(
        effective_check_interval(Duration::from_secs(61 * 60)),
        Duration::from_secs(60 * 60)
    );
    assert_eq!(
        effective_check_interval(Duration::from_secs(45 * 60)),
        Duration::from_secs(45 * 60)
    );
}

#[test]
fn test_sweeper_applies_floors_to_configured_values() {
    let dir = TempDir::new().expect("failed to create temp dir");
    let config = SqliteSinkConfig::new(dir.path().join("t.db"));
    let metrics = Arc::new(SqliteSinkMetrics::new());
    let writer = Arc::new(SqliteWriter::open(&config, Arc::clone(&metrics)).expect("open"));

    let sweeper = RetentionSweeper::new(
        writer,
        Duration::from_secs(60),
        Some(Duration::from_secs(60)),
        metrics,
    );
    assert_eq!(sweeper.period, RETENTION_PERIOD_FLOOR);
    assert_eq!(sweeper.check_interval, RETENTION_CHECK_QUANTUM);
}

#[test]
fn test_sweeper_defaults_check_interval_when_unset() {
    let dir = TempDir::new().expect("failed to create temp dir");
    let config = SqliteSinkConfig::new(dir.path().join("t.db"));
    let metrics = Arc::new(SqliteSinkMetrics::new());
    let writer = Arc::new(SqliteWriter::open(&config, Arc::clone(&metrics)).expect("open"));

    let sweeper = RetentionSweeper::new(writer, Duration::from_secs(7200), None, metrics);
    assert_eq!(sweeper.period, Duration::from_secs(7200));
    assert_eq!(sweeper.check_interval, RETENTION_CHECK_QUANTUM);
}

// =============================================================================
// Sweeping
// =============================================================================

#[test]
fn test_sweep_removes_expired_rows() {
    let dir = TempDir::new().expect("failed to create temp dir");
    let path = dir.path().join("t.db");
    let config = SqliteSinkConfig::new(&path).with_utc_timestamps();
    let metrics = Arc::new(SqliteSinkMetrics::new());
    let writer = Arc::new(SqliteWriter::open(&config, Arc::clone(&metrics)).expect("open"));

    let now = Utc::now().fixed_offset();
    let old = now - chrono::Duration::hours(2);
    writer.write_batch(&[
        LogEvent::new(old, Level::Information, "old-1"),
        LogEvent::new(old, Level::Information, "old-2"),
        LogEvent::new(now, Level::Information, "recent"),
    ]);

    let sweeper = RetentionSweeper::new(
        Arc::clone(&writer),
        Duration::from_secs(3600),
        None,
        Arc::clone(&metrics),
    );
    sweeper.sweep();

    let conn = Connection::open(&path).expect("open for reading");
    let remaining: i64 = conn
        .query_row("SELECT COUNT(*) FROM Logs", [], |r| r.get(0))
        .expect("count");
    assert_eq!(remaining, 1);

    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.retention_sweeps, 1);
    assert_eq!(snapshot.rows_expired, 2);
}

#[test]
fn test_sweep_on_empty_table_is_harmless() {
    let dir = TempDir::new().expect("failed to create temp dir");
    let config = SqliteSinkConfig::new(dir.path().join("t.db"));
    let metrics = Arc::new(SqliteSinkMetrics::new());
    let writer = Arc::new(SqliteWriter::open(&config, Arc::clone(&metrics)).expect("open"));

    let sweeper = RetentionSweeper::new(
        writer,
        Duration::from_secs(3600),
        None,
        Arc::clone(&metrics),
    );
    sweeper.sweep();
    sweeper.sweep();

    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.retention_sweeps, 2);
    assert_eq!(snapshot.rows_expired, 0);
}
