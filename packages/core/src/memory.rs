// ABOUTME: In-memory RangeSource over a fixed snapshot of rows
// ABOUTME: Reference semantics for range reads, also used to exercise the executor in tests

use std::convert::Infallible;

use async_trait::async_trait;

use crate::source::{Keyed, RangeQuery, RangeSource};

/// A sorted, immutable snapshot that serves range queries from memory.
///
/// Rows are expected to have unique keys, the same guarantee a database
/// primary key gives the SQL sources.
#[derive(Debug, Clone, Default)]
pub struct MemorySource<T> {
    rows: Vec<T>,
}

impl<T: Keyed> MemorySource<T> {
    pub fn new(mut rows: Vec<T>) -> Self {
        rows.sort_by_key(|row| row.ordering_key());
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows in ascending key order
    pub fn rows(&self) -> &[T] {
        &self.rows
    }
}

#[async_trait]
impl<T> RangeSource for MemorySource<T>
where
    T: Keyed + Clone + Send + Sync,
{
    type Row = T;
    type Error = Infallible;

    async fn fetch_range(&self, query: RangeQuery) -> Result<Vec<T>, Infallible> {
        let admitted = |row: &&T| query.admits(&row.ordering_key());

        let rows = if query.direction.is_descending() {
            self.rows
                .iter()
                .rev()
                .filter(admitted)
                .take(query.fetch)
                .cloned()
                .collect()
        } else {
            self.rows
                .iter()
                .filter(admitted)
                .take(query.fetch)
                .cloned()
                .collect()
        };

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Direction, OrderingKey};
    use uuid::Uuid;

    #[derive(Debug, Clone, PartialEq)]
    struct Row(OrderingKey);

    impl Keyed for Row {
        fn ordering_key(&self) -> OrderingKey {
            self.0
        }
    }

    fn row(nanos: i64) -> Row {
        Row(OrderingKey::from_nanos(nanos, Uuid::nil()))
    }

    #[tokio::test]
    async fn test_snapshot_is_sorted_on_construction() {
        let source = MemorySource::new(vec![row(3), row(1), row(2)]);
        assert_eq!(source.rows(), &[row(1), row(2), row(3)]);
        assert_eq!(source.len(), 3);
    }

    #[tokio::test]
    async fn test_fetch_respects_direction_bound_and_limit() {
        let source = MemorySource::new((0..10).map(row).collect());

        let ascending = source
            .fetch_range(RangeQuery {
                after: Some(row(4).0),
                direction: Direction::Ascending,
                fetch: 3,
            })
            .await
            .unwrap();
        assert_eq!(ascending, vec![row(5), row(6), row(7)]);

        let descending = source
            .fetch_range(RangeQuery {
                after: Some(row(4).0),
                direction: Direction::Descending,
                fetch: 10,
            })
            .await
            .unwrap();
        assert_eq!(descending, vec![row(3), row(2), row(1), row(0)]);
    }

    #[tokio::test]
    async fn test_empty_snapshot() {
        let source: MemorySource<Row> = MemorySource::new(Vec::new());
        assert!(source.is_empty());
        let rows = source
            .fetch_range(RangeQuery {
                after: None,
                direction: Direction::Ascending,
                fetch: 5,
            })
            .await
            .unwrap();
        assert!(rows.is_empty());
    }
}
