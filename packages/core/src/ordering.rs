// ABOUTME: Traversal direction over (timestamp, id) ordered collections
// ABOUTME: Turns a direction into key comparisons and the matching SQL fragments

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::key::OrderingKey;

/// Order in which a collection is walked.
///
/// The cursor format does not depend on direction: a cursor names an absolute
/// position and the direction decides which side of it the next page lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Oldest first
    #[default]
    Ascending,
    /// Newest first
    Descending,
}

impl Direction {
    /// Map the boundary's `time_desc` flag onto a direction
    pub fn from_time_desc(time_desc: bool) -> Self {
        if time_desc {
            Direction::Descending
        } else {
            Direction::Ascending
        }
    }

    pub fn is_descending(self) -> bool {
        self == Direction::Descending
    }

    /// Compare two keys in traversal order: `Less` means `a` is visited first
    pub fn compare(self, a: &OrderingKey, b: &OrderingKey) -> Ordering {
        match self {
            Direction::Ascending => a.cmp(b),
            Direction::Descending => b.cmp(a),
        }
    }

    /// True when `key` lies strictly past `bound` in traversal order
    pub fn is_past(self, key: &OrderingKey, bound: &OrderingKey) -> bool {
        self.compare(key, bound) == Ordering::Greater
    }

    /// Comparison operator for the keyset predicate
    pub fn comparison_operator(self) -> &'static str {
        match self {
            Direction::Ascending => ">",
            Direction::Descending => "<",
        }
    }

    /// Keyword for `ORDER BY`
    pub fn sort_keyword(self) -> &'static str {
        match self {
            Direction::Ascending => "ASC",
            Direction::Descending => "DESC",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn key(nanos: i64, last: u8) -> OrderingKey {
        let mut bytes = [0u8; 16];
        bytes[15] = last;
        OrderingKey::from_nanos(nanos, Uuid::from_bytes(bytes))
    }

    #[test]
    fn test_default_is_oldest_first() {
        assert_eq!(Direction::default(), Direction::Ascending);
        assert_eq!(Direction::from_time_desc(false), Direction::Ascending);
        assert_eq!(Direction::from_time_desc(true), Direction::Descending);
    }

    #[test]
    fn test_compare_reverses_for_descending() {
        let early = key(1, 9);
        let late = key(2, 0);
        assert_eq!(Direction::Ascending.compare(&early, &late), Ordering::Less);
        assert_eq!(Direction::Descending.compare(&early, &late), Ordering::Greater);
    }

    #[test]
    fn test_is_past_is_strict() {
        let bound = key(10, 5);
        assert!(!Direction::Ascending.is_past(&bound, &bound));
        assert!(!Direction::Descending.is_past(&bound, &bound));

        // Same timestamp, id decides
        assert!(Direction::Ascending.is_past(&key(10, 6), &bound));
        assert!(!Direction::Ascending.is_past(&key(10, 4), &bound));
        assert!(Direction::Descending.is_past(&key(10, 4), &bound));
        assert!(!Direction::Descending.is_past(&key(10, 6), &bound));
    }

    #[test]
    fn test_sql_fragments() {
        assert_eq!(Direction::Ascending.comparison_operator(), ">");
        assert_eq!(Direction::Ascending.sort_keyword(), "ASC");
        assert_eq!(Direction::Descending.comparison_operator(), "<");
        assert_eq!(Direction::Descending.sort_keyword(), "DESC");
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_string(&Direction::Descending).unwrap(),
            "\"descending\""
        );
    }
}
