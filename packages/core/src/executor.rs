// ABOUTME: Stateless keyset list executor
// ABOUTME: Decodes the caller's cursor, probes storage for limit + 1 rows and issues the next cursor

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{is_valid_page_size, DEFAULT_PAGE_SIZE};
use crate::cursor::{decode_cursor, encode_cursor};
use crate::error::ListError;
use crate::ordering::Direction;
use crate::source::{Keyed, RangeQuery, RangeSource};

/// Parameters for one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Cursor from the previous page. `Some("")` is an error, not a restart.
    pub cursor: Option<String>,
    pub direction: Direction,
    pub limit: usize,
}

impl PageRequest {
    /// Request the first page from whichever end `direction` starts at
    pub fn first(direction: Direction, limit: usize) -> Self {
        Self {
            cursor: None,
            direction,
            limit,
        }
    }

    /// Request the page that follows `cursor`
    pub fn after(cursor: impl Into<String>, direction: Direction, limit: usize) -> Self {
        Self {
            cursor: Some(cursor.into()),
            direction,
            limit,
        }
    }

    /// Continue from a previous page, keeping direction and limit.
    /// Returns `None` once the previous page was the last one.
    pub fn next<T>(&self, page: &Page<T>) -> Option<Self> {
        page.next_cursor
            .as_ref()
            .map(|cursor| Self::after(cursor.clone(), self.direction, self.limit))
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first(Direction::Ascending, DEFAULT_PAGE_SIZE)
    }
}

/// One page of rows plus the token for the next one
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Present exactly when `has_more` is true
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

impl<T: Keyed> Page<T> {
    /// Build a page from a `limit + 1` probe: the extra row only signals that
    /// more data exists and is dropped before returning.
    fn from_probe(mut rows: Vec<T>, limit: usize) -> Self {
        let has_more = rows.len() > limit;
        rows.truncate(limit);

        let next_cursor = if has_more {
            rows.last().map(|row| encode_cursor(&row.ordering_key()))
        } else {
            None
        };

        Self {
            items: rows,
            next_cursor,
            has_more,
        }
    }
}

impl<T> Page<T> {
    /// Convert the rows while keeping the continuation state
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            next_cursor: self.next_cursor,
            has_more: self.has_more,
        }
    }
}

/// Runs keyset list calls against a single collection.
///
/// Holds no state between calls; everything needed to resume lives in the
/// cursor string, so executors can be shared freely across tasks.
#[derive(Debug, Clone)]
pub struct ListExecutor<S> {
    source: S,
}

impl<S: RangeSource> ListExecutor<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch one page.
    ///
    /// Issues exactly one storage read. Cancelling the returned future drops
    /// the in-flight read with it.
    pub async fn list(&self, request: &PageRequest) -> Result<Page<S::Row>, ListError<S::Error>> {
        if !is_valid_page_size(request.limit) {
            return Err(ListError::InvalidLimit(request.limit));
        }

        let after = match request.cursor.as_deref() {
            Some(token) => Some(decode_cursor(token).map_err(|e| {
                debug!(error = %e, "Rejecting cursor");
                e
            })?),
            None => None,
        };

        let query = RangeQuery {
            after,
            direction: request.direction,
            fetch: request.limit + 1,
        };

        debug!(
            direction = ?query.direction,
            fetch = query.fetch,
            resumed = query.after.is_some(),
            "Fetching page"
        );

        let rows = self
            .source
            .fetch_range(query)
            .await
            .map_err(ListError::Storage)?;

        Ok(Page::from_probe(rows, request.limit))
    }
}
