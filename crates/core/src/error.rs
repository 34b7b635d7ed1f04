//! Unified error types for pagelift.
//!
//! Display strings carry a stable uppercase code prefix so log lines and
//! CLI output stay greppable across crates.

use tokio_rusqlite::rusqlite;

/// Unified error type for the page cache subsystem.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., empty page identifier).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// The storage area rejected a write for lack of capacity.
    #[error("QUOTA_EXCEEDED: {0}")]
    QuotaExceeded(String),

    /// Storage backend operation failed.
    #[error("STORAGE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("STORAGE_ERROR: migration failed: {0}")]
    MigrationFailed(String),

    /// Invalid URL.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// HTTP error response or transport failure.
    #[error("HTTP_ERROR: {0}")]
    HttpError(String),
}

impl Error {
    /// Whether this error is the storage-full condition that triggers
    /// the eviction pass.
    pub fn is_quota(&self) -> bool {
        matches!(self, Error::QuotaExceeded(_))
    }
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}
