//! Unified error types for leadscout.
//!
//! Display strings carry a stable upper-snake code so log lines and HTTP
//! error bodies can be grepped by category.

use tokio_rusqlite::rusqlite;

/// Unified error types for the leadscout service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Database operation failed.
    #[error("DB_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("DB_ERROR: migration failed: {0}")]
    MigrationFailed(String),

    /// Invalid cache key format.
    #[error("DB_ERROR: invalid hash format")]
    InvalidHash,
}

impl Error {
    /// Short machine-readable code for the error category.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Database(_) | Error::MigrationFailed(_) | Error::InvalidHash => "DB_ERROR",
        }
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
