// ABOUTME: Storage error type shared by every pagewise storage layer
// ABOUTME: Wraps sqlx, migration and JSON failures alongside lookup and input errors

use thiserror::Error;

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0} not found")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Corrupt row: {0}")]
    Corrupt(String),
}

impl StorageError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// Failures caused by the caller's data rather than the database
    pub fn is_client_error(&self) -> bool {
        matches!(self, StorageError::NotFound(_) | StorageError::InvalidInput(_))
    }
}

pub type StorageResult<T> = Result<T, StorageError>;
