// ABOUTME: Error types for cursor decoding, key construction and page listing
// ABOUTME: Client-input failures and storage failures stay distinct so callers can map them

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::constants::{MAX_PAGE_SIZE, MIN_PAGE_SIZE};

/// Reasons an incoming cursor token is rejected.
///
/// Every variant is a client-input problem: the caller must fix the token,
/// retrying the same request cannot succeed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CursorError {
    /// The cursor parameter was supplied but blank
    #[error("empty cursor")]
    Empty,

    /// Not valid base-64, or the payload lacks the `<timestamp>|<id>` shape
    #[error("bad cursor: {0}")]
    Malformed(String),

    /// Structurally valid, but the timestamp part is not a base-10 integer
    #[error("invalid cursor timestamp: {0:?}")]
    InvalidTimestamp(String),

    /// Structurally valid, but the id part is not a canonical UUID
    #[error("invalid cursor identifier: {0:?}")]
    InvalidIdentifier(String),
}

/// Errors raised while building an [`OrderingKey`](crate::OrderingKey)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("timestamp {0} cannot be represented as i64 nanoseconds since the Unix epoch")]
    TimestampOutOfRange(DateTime<Utc>),
}

/// Failure of a single list call.
///
/// `E` is the error type of the storage collaborator, passed through untouched.
#[derive(Error, Debug)]
pub enum ListError<E>
where
    E: std::error::Error + 'static,
{
    #[error(transparent)]
    BadCursor(#[from] CursorError),

    #[error("page limit {0} is outside {min}..={max}", min = MIN_PAGE_SIZE, max = MAX_PAGE_SIZE)]
    InvalidLimit(usize),

    #[error("storage query failed: {0}")]
    Storage(#[source] E),
}

impl<E> ListError<E>
where
    E: std::error::Error + 'static,
{
    /// Client errors (bad cursor, bad limit) are never worth retrying.
    /// A storage failure may be retried with the same cursor since listing
    /// performs no writes.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ListError::Storage(_))
    }

    /// True when the caller supplied invalid input
    pub fn is_client_error(&self) -> bool {
        !self.is_retryable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    #[test]
    fn test_malformed_message_mentions_bad_cursor() {
        let err = CursorError::Malformed("expected <timestamp>|<id>".to_string());
        assert!(err.to_string().contains("bad cursor"));
    }

    #[test]
    fn test_invalid_limit_message_names_bounds() {
        let err: ListError<Infallible> = ListError::InvalidLimit(500);
        assert_eq!(err.to_string(), "page limit 500 is outside 1..=200");
        assert!(err.is_client_error());
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_bad_cursor_is_transparent() {
        let err: ListError<Infallible> = CursorError::Empty.into();
        assert_eq!(err.to_string(), "empty cursor");
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_storage_error_is_retryable() {
        let err: ListError<std::io::Error> =
            ListError::Storage(std::io::Error::other("connection reset"));
        assert!(err.is_retryable());
        assert!(err.to_string().contains("connection reset"));
    }
}
