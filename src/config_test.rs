use super::*;
use crate::error::SqliteSinkError;

#[test]
fn test_defaults() {
    let config = SqliteSinkConfig::new("logs/app.db");

    assert_eq!(config.db_path, PathBuf::from("logs/app.db"));
    assert_eq!(config.table_name, DEFAULT_TABLE_NAME);
    assert!(!config.store_timestamp_in_utc);
    assert_eq!(config.min_level, Level::Verbose);
    assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
    assert_eq!(config.max_buffer_size, DEFAULT_MAX_BUFFER_SIZE);
    assert_eq!(config.flush_interval, DEFAULT_FLUSH_INTERVAL);
    assert!(config.retention_period.is_none());
    assert!(config.retention_check_interval.is_none());
    assert_eq!(config.max_db_mb, DEFAULT_MAX_DB_MB);
    assert!(config.roll_over);
}

#[test]
fn test_chained_builders() {
    let config = SqliteSinkConfig::new("t.db")
        .with_table_name("Audit")
        .with_utc_timestamps()
        .with_min_level(Level::Warning)
        .with_batch_size(250)
        .with_max_buffer_size(5_000)
        .with_flush_interval(Duration::from_secs(2))
        .with_retention(Duration::from_secs(3600))
        .with_retention_check_interval(Duration::from_secs(1800))
        .with_max_db_size_mb(100)
        .without_rollover();

    assert_eq!(config.table_name, "Audit");
    assert!(config.store_timestamp_in_utc);
    assert_eq!(config.min_level, Level::Warning);
    assert_eq!(config.batch_size, 250);
    assert_eq!(config.max_buffer_size, 5_000);
    assert_eq!(config.flush_interval, Duration::from_secs(2));
    assert_eq!(config.retention_period, Some(Duration::from_secs(3600)));
    assert_eq!(
        config.retention_check_interval,
        Some(Duration::from_secs(1800))
    );
    assert_eq!(config.max_db_mb, 100);
    assert!(!config.roll_over);
}

#[test]
fn test_default_config_validates() {
    assert!(SqliteSinkConfig::new("t.db").validate().is_ok());
}

#[test]
fn test_table_name_must_be_an_identifier() {
    for bad in ["", "1abc", "a b", "logs;drop table x", "läufe", "a-b"] {
        let config = SqliteSinkConfig::new("t.db").with_table_name(bad);
        assert!(
            matches!(config.validate(), Err(SqliteSinkError::Config(_))),
            "expected {:?} to be rejected",
            bad
        );
    }
    for good in ["Logs", "_logs", "audit_2024", "L"] {
        let config = SqliteSinkConfig::new("t.db").with_table_name(good);
        assert!(config.validate().is_ok(), "expected {:?} to be accepted", good);
    }
}

#[test]
fn test_batch_size_must_be_positive() {
    let config = SqliteSinkConfig::new("t.db").with_batch_size(0);
    assert!(matches!(config.validate(), Err(SqliteSinkError::Config(_))));
}

#[test]
fn test_buffer_size_must_be_positive() {
    let config = SqliteSinkConfig::new("t.db").with_max_buffer_size(0);
    assert!(matches!(config.validate(), Err(SqliteSinkError::Config(_))));
}

#[test]
fn test_batch_size_cannot_exceed_buffer() {
    let config = SqliteSinkConfig::new("t.db")
        .with_batch_size(101)
        .with_max_buffer_size(100);
    assert!(matches!(config.validate(), Err(SqliteSinkError::Config(_))));
}

#[test]
fn test_flush_interval_floor() {
    let config = SqliteSinkConfig::new("t.db").with_flush_interval(Duration::from_millis(50));
    assert!(matches!(config.validate(), Err(SqliteSinkError::Config(_))));

    let config = SqliteSinkConfig::new("t.db").with_flush_interval(MIN_FLUSH_INTERVAL);
    assert!(config.validate().is_ok());
}

#[test]
fn test_max_db_mb_bounds() {
    let config = SqliteSinkConfig::new("t.db").with_max_db_size_mb(0);
    assert!(matches!(config.validate(), Err(SqliteSinkError::Config(_))));

    let config = SqliteSinkConfig::new("t.db").with_max_db_size_mb(MAX_DB_MB_LIMIT + 1);
    assert!(matches!(config.validate(), Err(SqliteSinkError::Config(_))));

    let config = SqliteSinkConfig::new("t.db").with_max_db_size_mb(MAX_DB_MB_LIMIT);
    assert!(config.validate().is_ok());
}

#[test]
fn test_relative_paths_resolve_against_working_directory() {
    let config = SqliteSinkConfig::new("t.db");
    let resolved = config.resolved_db_path();
    assert!(resolved.is_absolute());
    assert!(resolved.ends_with("t.db"));
}

#[test]
fn test_absolute_paths_are_untouched() {
    let path = std::env::temp_dir().join("sqlog-abs.db");
    let config = SqliteSinkConfig::new(&path);
    assert_eq!(config.resolved_db_path(), path);
}
