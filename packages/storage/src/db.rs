// ABOUTME: Database connection management and storage initialization
// ABOUTME: Provides shared access to the SQLite pool and the session, task and message stores

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::StorageError;
use crate::messages::MessageStorage;
use crate::sessions::SessionStorage;
use crate::tasks::TaskStorage;

/// Default pool size for file-backed databases
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Shared database state for API handlers
#[derive(Clone)]
pub struct DbState {
    pub pool: SqlitePool,
    pub session_storage: Arc<SessionStorage>,
    pub task_storage: Arc<TaskStorage>,
    pub message_storage: Arc<MessageStorage>,
}

impl DbState {
    /// Create new database state from a migrated SQLite pool
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            session_storage: Arc::new(SessionStorage::new(pool.clone())),
            task_storage: Arc::new(TaskStorage::new(pool.clone())),
            message_storage: Arc::new(MessageStorage::new(pool.clone())),
            pool,
        }
    }

    /// Initialize database state with default configuration
    pub async fn init() -> Result<Self, StorageError> {
        Self::init_with_path(None, DEFAULT_MAX_CONNECTIONS).await
    }

    /// Initialize database state with optional custom database path
    pub async fn init_with_path(
        database_path: Option<PathBuf>,
        max_connections: u32,
    ) -> Result<Self, StorageError> {
        let database_path = database_path.unwrap_or_else(pagewise_core::database_file);

        // Ensure parent directory exists
        if let Some(parent) = database_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        debug!("Connecting to database: {}", database_path.display());

        // Pragmas set here apply to every pooled connection
        let options = SqliteConnectOptions::new()
            .filename(&database_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(options)
            .await?;

        info!("Database connection established");

        Self::migrate(pool).await
    }

    /// A private in-memory database, used by tests and ephemeral runs.
    ///
    /// Each SQLite memory connection is its own database, so the pool is pinned
    /// to one connection that never expires.
    pub async fn in_memory() -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::new()
            .in_memory(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::migrate(pool).await
    }

    /// Round-trip a trivial query through the pool
    pub async fn ping(&self) -> Result<(), StorageError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn migrate(pool: SqlitePool) -> Result<Self, StorageError> {
        sqlx::migrate!("./migrations").run(&pool).await?;

        debug!("Database migrations completed");

        Ok(Self::new(pool))
    }
}
