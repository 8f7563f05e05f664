// ABOUTME: Session storage layer using SQLite
// ABOUTME: Sessions own the task and message collections that are paged by key

use chrono::{DateTime, Utc};
use pagewise_core::OrderingKey;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::StorageError;
use crate::keyset::parse_id;
use crate::types::{Session, SessionCreateInput};

pub struct SessionStorage {
    pool: SqlitePool,
}

impl SessionStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_session(&self, input: SessionCreateInput) -> Result<Session, StorageError> {
        let id = Uuid::new_v4();
        let key = stamp(input.created_at, id)?;

        debug!("Creating session: {}", id);

        sqlx::query("INSERT INTO sessions (id, title, created_at) VALUES (?, ?, ?)")
            .bind(id.to_string())
            .bind(&input.title)
            .bind(key.nanos())
            .execute(&self.pool)
            .await?;

        self.get_session(id).await
    }

    pub async fn get_session(&self, session_id: Uuid) -> Result<Session, StorageError> {
        debug!("Fetching session: {}", session_id);

        let row = sqlx::query("SELECT id, title, created_at FROM sessions WHERE id = ?")
            .bind(session_id.to_string())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StorageError::not_found(format!("session {session_id}")))?;

        row_to_session(&row)
    }

    /// Fail with `NotFound` unless the session exists
    pub async fn ensure_exists(&self, session_id: Uuid) -> Result<(), StorageError> {
        let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM sessions WHERE id = ?")
            .bind(session_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        match found {
            Some(_) => Ok(()),
            None => Err(StorageError::not_found(format!("session {session_id}"))),
        }
    }
}

/// Resolve an optional creation time into a key, defaulting to now
pub(crate) fn stamp(
    created_at: Option<DateTime<Utc>>,
    id: Uuid,
) -> Result<OrderingKey, StorageError> {
    let created_at = created_at.unwrap_or_else(Utc::now);
    OrderingKey::new(&created_at, id).map_err(|e| StorageError::InvalidInput(e.to_string()))
}

fn row_to_session(row: &SqliteRow) -> Result<Session, StorageError> {
    let id = parse_id("id", &row.try_get::<String, _>("id")?)?;
    let nanos: i64 = row.try_get("created_at")?;

    Ok(Session {
        id,
        title: row.try_get("title")?,
        created_at: OrderingKey::from_nanos(nanos, id).timestamp(),
    })
}
