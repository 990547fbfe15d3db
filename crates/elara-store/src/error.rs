//! Error types for the store module.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Row serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A second resource claiming an occupied (project, path) slot.
    #[error("duplicate resource path: {0}")]
    DuplicatePath(String),

    /// Row content that does not parse back into domain types.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),

    /// Internal lock was poisoned (a thread panicked while holding it).
    #[error("store lock poisoned: {0}")]
    LockPoisoned(String),

    /// A blocking task failed to complete.
    #[error("background task failed: {0}")]
    Background(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<elara_core::CoreError> for StoreError {
    fn from(e: elara_core::CoreError) -> Self {
        StoreError::InvalidData(e.to_string())
    }
}

impl From<elara_pagos::PagosError> for StoreError {
    fn from(e: elara_pagos::PagosError) -> Self {
        StoreError::InvalidData(e.to_string())
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
