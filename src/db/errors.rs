//! User store error types
//!
//! The HTTP layer branches on this closed set rather than sniffing
//! error strings; the only distinguished storage signal is a
//! unique-constraint violation.

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Failures surfaced by the user store
#[derive(Debug, Error)]
pub enum StoreError {
    /// An insert or update would duplicate a value declared UNIQUE
    #[error("unique constraint violation")]
    UniqueViolation,

    /// Any other database failure, treated as opaque
    #[error("database error: {0}")]
    Database(rusqlite::Error),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        match &e {
            rusqlite::Error::SqliteFailure(err, _)
                if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    || err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
            {
                StoreError::UniqueViolation
            }
            _ => StoreError::Database(e),
        }
    }
}
