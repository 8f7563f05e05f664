// ABOUTME: Composite (timestamp, id) ordering key used for keyset pagination
// ABOUTME: Timestamps are held as UTC nanoseconds so ordering and encoding never depend on zones

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use crate::error::KeyError;

/// Position of a row in a time-ordered collection.
///
/// Keys order by timestamp first and id second. The derived ordering on
/// [`Uuid`] compares big-endian bytes, which is the same order as comparing
/// canonical lowercase hyphenated strings.
///
/// Timestamps are stored as signed nanoseconds since the Unix epoch, which
/// covers 1677-09-21 through 2262-04-11. Pre-epoch instants are supported;
/// anything outside that window is rejected by [`OrderingKey::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OrderingKey {
    nanos: i64,
    id: Uuid,
}

impl OrderingKey {
    /// Build a key from a timestamp in any zone, normalizing it to UTC
    pub fn new<Tz: TimeZone>(timestamp: &DateTime<Tz>, id: Uuid) -> Result<Self, KeyError> {
        let utc = timestamp.with_timezone(&Utc);
        let nanos = utc
            .timestamp_nanos_opt()
            .ok_or(KeyError::TimestampOutOfRange(utc))?;
        Ok(Self { nanos, id })
    }

    /// Build a key from raw UTC nanoseconds, as stored by the database layer
    pub const fn from_nanos(nanos: i64, id: Uuid) -> Self {
        Self { nanos, id }
    }

    /// Nanoseconds since the Unix epoch (UTC)
    pub const fn nanos(&self) -> i64 {
        self.nanos
    }

    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// The key's instant, always in UTC
    pub fn timestamp(&self) -> DateTime<Utc> {
        Utc.timestamp_nanos(self.nanos)
    }
}
