// ABOUTME: Message storage layer using SQLite
// ABOUTME: Appends chat messages to a session and pages them by creation time

use async_trait::async_trait;
use pagewise_core::{OrderingKey, RangeQuery, RangeSource};
use serde_json::{json, Map, Value};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::StorageError;
use crate::keyset::{fetch_keyset, parse_id};
use crate::sessions::stamp;
use crate::types::{Message, MessageCreateInput, MessageRole};

const MESSAGE_COLUMNS: &str =
    "id, session_id, parent_id, task_id, role, parts, meta, created_at, updated_at";

/// Recorded as `meta.source_format` when the caller does not name one
pub const DEFAULT_SOURCE_FORMAT: &str = "pagewise";

/// Part types that carry inline text
const TEXT_PART_TYPES: &[&str] = &["text"];
/// Part types whose payload lives in `meta`
const TOOL_PART_TYPES: &[&str] = &["tool-call", "tool-result"];
/// Part types that reference an uploaded file
const FILE_PART_TYPES: &[&str] = &["image", "audio", "video", "file"];

pub struct MessageStorage {
    pool: SqlitePool,
}

impl MessageStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_message(
        &self,
        session_id: Uuid,
        input: MessageCreateInput,
    ) -> Result<Message, StorageError> {
        let message_id = Uuid::new_v4();
        let key = stamp(input.created_at, message_id)?;
        let parts = input.parts.unwrap_or_else(|| json!([]));
        validate_parts(&parts)?;
        let meta = with_source_format(input.meta);
        if let Some(parent_id) = input.parent_id {
            self.ensure_parent(session_id, parent_id).await?;
        }

        debug!(
            "Creating {:?} message: {} for session: {}",
            input.role, message_id, session_id
        );

        sqlx::query(
            r#"
            INSERT INTO messages
                (id, session_id, parent_id, task_id, role, parts, meta, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(message_id.to_string())
        .bind(session_id.to_string())
        .bind(input.parent_id.map(|id| id.to_string()))
        .bind(input.task_id.map(|id| id.to_string()))
        .bind(input.role)
        .bind(serde_json::to_string(&parts)?)
        .bind(serde_json::to_string(&meta)?)
        .bind(key.nanos())
        .bind(key.nanos())
        .execute(&self.pool)
        .await?;

        self.get_message(message_id).await
    }

    pub async fn get_message(&self, message_id: Uuid) -> Result<Message, StorageError> {
        debug!("Fetching message: {}", message_id);

        let sql = format!("SELECT {MESSAGE_COLUMNS} FROM messages WHERE id = ?");
        let row = sqlx::query(&sql)
            .bind(message_id.to_string())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StorageError::not_found(format!("message {message_id}")))?;

        row_to_message(&row)
    }

    /// A parent must already exist in the same session
    async fn ensure_parent(&self, session_id: Uuid, parent_id: Uuid) -> Result<(), StorageError> {
        let owner: Option<String> =
            sqlx::query_scalar("SELECT session_id FROM messages WHERE id = ?")
                .bind(parent_id.to_string())
                .fetch_optional(&self.pool)
                .await?;

        match owner {
            None => Err(StorageError::InvalidInput(format!(
                "parent message {parent_id} does not exist"
            ))),
            Some(owner) if owner != session_id.to_string() => Err(StorageError::InvalidInput(
                format!("parent message {parent_id} belongs to another session"),
            )),
            Some(_) => Ok(()),
        }
    }

    /// The messages of one session as a keyset range source
    pub fn session(&self, session_id: Uuid) -> SessionMessages {
        SessionMessages {
            pool: self.pool.clone(),
            session_id,
        }
    }
}

/// Messages belonging to a single session, ordered by `(created_at, id)`
#[derive(Clone)]
pub struct SessionMessages {
    pool: SqlitePool,
    session_id: Uuid,
}

#[async_trait]
impl RangeSource for SessionMessages {
    type Row = Message;
    type Error = StorageError;

    async fn fetch_range(&self, query: RangeQuery) -> Result<Vec<Message>, StorageError> {
        let rows =
            fetch_keyset(&self.pool, "messages", MESSAGE_COLUMNS, self.session_id, &query).await?;
        rows.iter().map(row_to_message).collect()
    }
}

fn row_to_message(row: &SqliteRow) -> Result<Message, StorageError> {
    let id = parse_id("id", &row.try_get::<String, _>("id")?)?;
    let session_id = parse_id("session_id", &row.try_get::<String, _>("session_id")?)?;
    let parent_id = row
        .try_get::<Option<String>, _>("parent_id")?
        .map(|raw| parse_id("parent_id", &raw))
        .transpose()?;
    let task_id = row
        .try_get::<Option<String>, _>("task_id")?
        .map(|raw| parse_id("task_id", &raw))
        .transpose()?;
    let key = OrderingKey::from_nanos(row.try_get("created_at")?, id);
    let role: MessageRole = row.try_get("role")?;
    let parts: String = row.try_get("parts")?;
    let meta: String = row.try_get("meta")?;
    let updated_at = OrderingKey::from_nanos(row.try_get("updated_at")?, id).timestamp();

    Ok(Message {
        id,
        session_id,
        parent_id,
        task_id,
        role,
        parts: serde_json::from_str(&parts)?,
        meta: serde_json::from_str(&meta)?,
        created_at: key.timestamp(),
        updated_at,
        key,
    })
}

fn with_source_format(meta: Option<Map<String, Value>>) -> Value {
    let mut meta = meta.unwrap_or_default();
    meta.entry("source_format")
        .or_insert_with(|| Value::String(DEFAULT_SOURCE_FORMAT.to_string()));
    Value::Object(meta)
}

/// Check every part's shape, naming the first bad index
fn validate_parts(parts: &Value) -> Result<(), StorageError> {
    let parts = parts.as_array().ok_or_else(|| {
        StorageError::InvalidInput("message parts must be a JSON array".to_string())
    })?;

    for (index, part) in parts.iter().enumerate() {
        validate_part(part).map_err(|reason| {
            StorageError::InvalidInput(format!("invalid part at index {index}: {reason}"))
        })?;
    }
    Ok(())
}

fn validate_part(part: &Value) -> Result<(), String> {
    let part = part.as_object().ok_or("part must be a JSON object")?;
    let part_type = part
        .get("type")
        .and_then(Value::as_str)
        .ok_or("part type is required")?;

    if let Some(meta) = part.get("meta") {
        if !meta.is_object() && !meta.is_null() {
            return Err("meta must be an object".to_string());
        }
    }

    if TEXT_PART_TYPES.contains(&part_type) {
        match part.get("text").and_then(Value::as_str) {
            Some(_) => Ok(()),
            None => Err(format!("{part_type} part requires text")),
        }
    } else if TOOL_PART_TYPES.contains(&part_type) {
        match part.get("meta") {
            Some(Value::Object(_)) => Ok(()),
            _ => Err(format!("{part_type} part requires meta")),
        }
    } else if FILE_PART_TYPES.contains(&part_type) {
        let named = part.get("filename").and_then(Value::as_str).is_some();
        let uploaded = part.get("asset").is_some_and(Value::is_object);
        if named || uploaded {
            Ok(())
        } else {
            Err(format!("{part_type} part requires a filename or asset"))
        }
    } else {
        Err(format!("unknown part type: {part_type}"))
    }
}
