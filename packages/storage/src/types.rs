// ABOUTME: Session, task and message records persisted by pagewise
// ABOUTME: Every record carries the (created_at, id) ordering key used for keyset paging

use chrono::{DateTime, Utc};
use pagewise_core::{Keyed, OrderingKey};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Pending,
    Running,
    Success,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session {
    pub id: Uuid,
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Task {
    pub id: Uuid,
    pub session_id: Uuid,
    pub order: i64,
    pub status: TaskStatus,
    pub data: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip)]
    pub(crate) key: OrderingKey,
}

impl Keyed for Task {
    fn ordering_key(&self) -> OrderingKey {
        self.key
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub id: Uuid,
    pub session_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub task_id: Option<Uuid>,
    pub role: MessageRole,
    pub parts: serde_json::Value,
    pub meta: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip)]
    pub(crate) key: OrderingKey,
}

impl Keyed for Message {
    fn ordering_key(&self) -> OrderingKey {
        self.key
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionCreateInput {
    pub title: Option<String>,
    /// Defaults to now
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskCreateInput {
    pub order: Option<i64>,
    pub status: Option<TaskStatus>,
    pub data: Option<serde_json::Value>,
    /// Defaults to now. Callers importing history set it explicitly.
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageCreateInput {
    pub role: MessageRole,
    /// Defaults to no parts
    pub parts: Option<serde_json::Value>,
    /// Earlier message in the same session this one replies to
    pub parent_id: Option<Uuid>,
    pub task_id: Option<Uuid>,
    /// `source_format` is filled in when absent
    pub meta: Option<serde_json::Map<String, serde_json::Value>>,
    pub created_at: Option<DateTime<Utc>>,
}

impl MessageCreateInput {
    pub fn new(role: MessageRole) -> Self {
        Self {
            role,
            parts: None,
            parent_id: None,
            task_id: None,
            meta: None,
            created_at: None,
        }
    }
}
