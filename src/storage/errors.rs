//! Storage error types
//!
//! Error codes:
//! - AGRI_STORAGE_UNAVAILABLE
//! - AGRI_STORAGE_QUERY_FAILED
//! - AGRI_STORAGE_CORRUPT_ROW
//! - AGRI_STORAGE_MIGRATION_FAILED
//!
//! None of these are recovered locally. The HTTP layer turns every one of
//! them into a 500.

use thiserror::Error;

/// Storage-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorCode {
    /// Medium cannot be reached (open failure, pool exhausted, poisoned lock)
    AgriStorageUnavailable,
    /// A statement failed to execute
    AgriStorageQueryFailed,
    /// A persisted row cannot be mapped back to a record
    AgriStorageCorruptRow,
    /// Schema migration could not be applied
    AgriStorageMigrationFailed,
}

impl StorageErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            StorageErrorCode::AgriStorageUnavailable => "AGRI_STORAGE_UNAVAILABLE",
            StorageErrorCode::AgriStorageQueryFailed => "AGRI_STORAGE_QUERY_FAILED",
            StorageErrorCode::AgriStorageCorruptRow => "AGRI_STORAGE_CORRUPT_ROW",
            StorageErrorCode::AgriStorageMigrationFailed => "AGRI_STORAGE_MIGRATION_FAILED",
        }
    }
}

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Medium unavailable
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// No pooled connection could be checked out
    #[error("connection pool: {0}")]
    Pool(#[from] r2d2::Error),

    /// SQLite statement failure
    #[error("query failed: {0}")]
    Query(#[from] rusqlite::Error),

    /// Row could not be decoded
    #[error("corrupt row for id {id}: {reason}")]
    CorruptRow { id: i64, reason: String },

    /// Schema version mismatch or failed migration
    #[error("migration failed: {0}")]
    Migration(String),
}

impl StorageError {
    /// Shorthand for a poisoned lock
    pub fn lock_poisoned() -> Self {
        StorageError::Unavailable("lock poisoned".to_string())
    }

    /// Returns the error code
    pub fn code(&self) -> StorageErrorCode {
        match self {
            StorageError::Unavailable(_) | StorageError::Pool(_) => {
                StorageErrorCode::AgriStorageUnavailable
            }
            StorageError::Query(_) => StorageErrorCode::AgriStorageQueryFailed,
            StorageError::CorruptRow { .. } => StorageErrorCode::AgriStorageCorruptRow,
            StorageError::Migration(_) => StorageErrorCode::AgriStorageMigrationFailed,
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
