//! Error types for the store module.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Record field encoding/decoding error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Manuscript not found where one was required.
    #[error("manuscript not found: {0}")]
    NotFound(String),

    /// Invalid data in storage.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),

    /// A lock guarding in-process state was poisoned by a panicking writer.
    #[error("store lock poisoned: {0}")]
    LockPoisoned(String),

    /// A blocking database task failed to complete.
    #[error("blocking task failed: {0}")]
    Task(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
