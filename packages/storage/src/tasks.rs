// ABOUTME: Task storage layer using SQLite
// ABOUTME: Creates tasks and serves session-scoped keyset ranges over them

use async_trait::async_trait;
use pagewise_core::{OrderingKey, RangeQuery, RangeSource};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::StorageError;
use crate::keyset::{fetch_keyset, parse_id};
use crate::sessions::stamp;
use crate::types::{Task, TaskCreateInput, TaskStatus};

const TASK_COLUMNS: &str = "id, session_id, task_order, status, data, created_at, updated_at";

pub struct TaskStorage {
    pool: SqlitePool,
}

impl TaskStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_task(
        &self,
        session_id: Uuid,
        input: TaskCreateInput,
    ) -> Result<Task, StorageError> {
        let task_id = Uuid::new_v4();
        let key = stamp(input.created_at, task_id)?;
        let data = input.data.unwrap_or_else(|| serde_json::json!({}));

        debug!("Creating task: {} for session: {}", task_id, session_id);

        sqlx::query(
            r#"
            INSERT INTO tasks (id, session_id, task_order, status, data, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(task_id.to_string())
        .bind(session_id.to_string())
        .bind(input.order.unwrap_or(0))
        .bind(input.status.unwrap_or_default())
        .bind(serde_json::to_string(&data)?)
        .bind(key.nanos())
        .bind(key.nanos())
        .execute(&self.pool)
        .await?;

        self.get_task(task_id).await
    }

    pub async fn get_task(&self, task_id: Uuid) -> Result<Task, StorageError> {
        debug!("Fetching task: {}", task_id);

        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?");
        let row = sqlx::query(&sql)
            .bind(task_id.to_string())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StorageError::not_found(format!("task {task_id}")))?;

        row_to_task(&row)
    }

    /// The tasks of one session as a keyset range source
    pub fn session(&self, session_id: Uuid) -> SessionTasks {
        SessionTasks {
            pool: self.pool.clone(),
            session_id,
        }
    }
}

/// Tasks belonging to a single session, ordered by `(created_at, id)`
#[derive(Clone)]
pub struct SessionTasks {
    pool: SqlitePool,
    session_id: Uuid,
}

#[async_trait]
impl RangeSource for SessionTasks {
    type Row = Task;
    type Error = StorageError;

    async fn fetch_range(&self, query: RangeQuery) -> Result<Vec<Task>, StorageError> {
        let rows = fetch_keyset(&self.pool, "tasks", TASK_COLUMNS, self.session_id, &query).await?;
        rows.iter().map(row_to_task).collect()
    }
}

fn row_to_task(row: &SqliteRow) -> Result<Task, StorageError> {
    let id = parse_id("id", &row.try_get::<String, _>("id")?)?;
    let session_id = parse_id("session_id", &row.try_get::<String, _>("session_id")?)?;
    let key = OrderingKey::from_nanos(row.try_get("created_at")?, id);
    let updated_nanos: i64 = row.try_get("updated_at")?;
    let data: String = row.try_get("data")?;
    let status: TaskStatus = row.try_get("status")?;

    Ok(Task {
        id,
        session_id,
        order: row.try_get("task_order")?,
        status,
        data: serde_json::from_str(&data)?,
        created_at: key.timestamp(),
        updated_at: OrderingKey::from_nanos(updated_nanos, id).timestamp(),
        key,
    })
}
