// ABOUTME: API error type and its JSON error envelope
// ABOUTME: Maps cursor, limit and storage failures onto status codes with sanitized messages

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pagewise_core::{CursorError, ListError};
use pagewise_storage::StorageError;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

/// Main application error type that all handlers return
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid page limit: {0}")]
    InvalidLimit(i64),

    #[error("Invalid cursor: {0}")]
    BadCursor(#[from] CursorError),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(StorageError),
}

/// Whether error responses carry the underlying error text.
///
/// Chosen once at startup and handed to every handler through the router
/// state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorDetail {
    Expose,
    #[default]
    Hide,
}

impl ErrorDetail {
    pub fn from_expose_flag(expose: bool) -> Self {
        if expose {
            ErrorDetail::Expose
        } else {
            ErrorDetail::Hide
        }
    }
}

/// Structured error response format for API consistency
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: ErrorBody,
    request_id: String,
}

/// Error body with a machine-readable code
#[derive(Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

impl AppError {
    /// Convert AppError to appropriate HTTP status code and error code
    pub fn to_status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::InvalidLimit(_) => (StatusCode::BAD_REQUEST, "INVALID_LIMIT"),
            AppError::BadCursor(_) => (StatusCode::BAD_REQUEST, "BAD_CURSOR"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
        }
    }

    /// Get user-friendly error message (sanitized for external consumption)
    pub fn to_user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => format!("Validation failed: {}", msg),
            AppError::InvalidLimit(limit) => format!(
                "limit must be between {} and {}, got {}",
                pagewise_core::MIN_PAGE_SIZE,
                pagewise_core::MAX_PAGE_SIZE,
                limit
            ),
            AppError::BadCursor(CursorError::Empty) => "Cursor must not be empty".to_string(),
            AppError::BadCursor(_) => "Cursor is not valid for this collection".to_string(),
            AppError::NotFound(what) => format!("{} not found", what),
            AppError::Storage(_) => "Data storage error".to_string(),
        }
    }

    /// Pair the error with the detail policy in force for this request
    pub fn reply(self, detail: ErrorDetail) -> ErrorReply {
        ErrorReply {
            error: self,
            detail,
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(what) => AppError::NotFound(what),
            StorageError::InvalidInput(msg) => AppError::Validation(msg),
            other => AppError::Storage(other),
        }
    }
}

impl From<ListError<StorageError>> for AppError {
    fn from(err: ListError<StorageError>) -> Self {
        match err {
            ListError::BadCursor(e) => AppError::BadCursor(e),
            ListError::InvalidLimit(limit) => {
                AppError::InvalidLimit(i64::try_from(limit).unwrap_or(i64::MAX))
            }
            ListError::Storage(e) => AppError::from(e),
        }
    }
}

/// An error ready to be rendered under a given detail policy
#[derive(Debug)]
pub struct ErrorReply {
    error: AppError,
    detail: ErrorDetail,
}

impl IntoResponse for ErrorReply {
    fn into_response(self) -> Response {
        let request_id = Uuid::new_v4().to_string();
        let (status_code, error_code) = self.error.to_status_and_code();

        match &self.error {
            AppError::Storage(err) => {
                error!(
                    request_id = %request_id,
                    storage_error = %err,
                    "Storage system error"
                );
            }
            _ => {
                // Client errors are expected traffic
                info!(
                    request_id = %request_id,
                    error_code = %error_code,
                    error = %self.error,
                    "API error response"
                );
            }
        }

        let detail = match self.detail {
            ErrorDetail::Expose => Some(self.error.to_string()),
            ErrorDetail::Hide => None,
        };

        let body = ErrorResponse {
            success: false,
            error: ErrorBody {
                code: error_code,
                message: self.error.to_user_message(),
                detail,
            },
            request_id,
        };

        (status_code, Json(body)).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.reply(ErrorDetail::Hide).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, AppError>;
