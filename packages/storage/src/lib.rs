// ABOUTME: SQLite persistence for pagewise sessions, tasks and messages
// ABOUTME: Exposes session-scoped keyset range sources for the list executor

pub mod db;
pub mod error;
mod keyset;
pub mod messages;
pub mod sessions;
pub mod tasks;
pub mod types;

pub use db::{DbState, DEFAULT_MAX_CONNECTIONS};
pub use error::{StorageError, StorageResult};
pub use messages::{MessageStorage, SessionMessages, DEFAULT_SOURCE_FORMAT};
pub use sessions::SessionStorage;
pub use tasks::{SessionTasks, TaskStorage};
pub use types::{
    Message, MessageCreateInput, MessageRole, Session, SessionCreateInput, Task, TaskCreateInput,
    TaskStatus,
};
