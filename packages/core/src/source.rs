// ABOUTME: Storage collaborator interface consumed by the list executor
// ABOUTME: A source answers one ordered range query per page, nothing more

use async_trait::async_trait;

use crate::key::OrderingKey;
use crate::ordering::Direction;

/// A row that knows its position in the collection
pub trait Keyed {
    fn ordering_key(&self) -> OrderingKey;
}

/// One ordered range read.
///
/// Sources must return at most `fetch` rows, sorted by `(timestamp, id)` in
/// `direction`, each lying strictly past `after` when it is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeQuery {
    pub after: Option<OrderingKey>,
    pub direction: Direction,
    pub fetch: usize,
}

impl RangeQuery {
    /// Whether a row with `key` belongs to this range
    pub fn admits(&self, key: &OrderingKey) -> bool {
        match &self.after {
            Some(bound) => self.direction.is_past(key, bound),
            None => true,
        }
    }
}

/// Anything that can serve ordered range reads over a keyed collection
#[async_trait]
pub trait RangeSource: Send + Sync {
    type Row: Keyed + Send;
    type Error: std::error::Error + Send + Sync + 'static;

    async fn fetch_range(&self, query: RangeQuery) -> Result<Vec<Self::Row>, Self::Error>;
}
