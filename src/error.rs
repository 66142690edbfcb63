//! Sink errors
//!
//! Only construction errors ever reach the caller: a misconfigured sink must
//! be detected at startup. Everything on the write path is reported through
//! `tracing` and swallowed; this is a log sink, not a transactional store.

/// Errors from the SQLite sink
#[derive(Debug, thiserror::Error)]
pub enum SqliteSinkError {
    /// Configuration rejected before the database was touched
    #[error("configuration error: {0}")]
    Config(String),

    /// Opening the database or creating the log table failed
    #[error("schema bootstrap failed: {source}")]
    Bootstrap {
        #[source]
        source: rusqlite::Error,
    },

    /// Database error
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Filesystem error (path resolution, rollover copy)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SqliteSinkError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub(crate) fn bootstrap(source: rusqlite::Error) -> Self {
        Self::Bootstrap { source }
    }
}
