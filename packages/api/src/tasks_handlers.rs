// ABOUTME: HTTP request handlers for session tasks
// ABOUTME: Cursor-paged task listing and task creation

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    response::Response,
    Json,
};
use pagewise_core::{ListExecutor, Page};
use pagewise_storage::{Task, TaskCreateInput};
use tracing::info;

use crate::error::{ApiResult, AppError};
use crate::pagination::ListQuery;
use crate::response::{created_or_reply, ok_or_reply};
use crate::sessions_handlers::resolve_session;
use crate::AppState;

/// List one page of a session's tasks
pub async fn list_tasks(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Response {
    let result = list_session_tasks(&state, &session_id, query).await;
    ok_or_reply(result, state.error_detail)
}

async fn list_session_tasks(
    state: &AppState,
    session_id: &str,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Page<Task>> {
    let Query(query) = query.map_err(|e| AppError::validation(e.body_text()))?;
    let request = query.into_page_request()?;
    let session_id = resolve_session(state, session_id).await?;

    info!(
        "Listing tasks for session: {} (limit: {}, direction: {:?}, resumed: {})",
        session_id,
        request.limit,
        request.direction,
        request.cursor.is_some()
    );

    let executor = ListExecutor::new(state.db.task_storage.session(session_id));
    Ok(executor.list(&request).await?)
}

/// Create a task in a session
pub async fn create_task(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    body: Result<Json<TaskCreateInput>, JsonRejection>,
) -> Response {
    let result = async {
        let Json(input) = body.map_err(|e| AppError::validation(e.body_text()))?;
        let session_id = resolve_session(&state, &session_id).await?;
        info!("Creating task for session: {}", session_id);
        Ok::<Task, AppError>(state.db.task_storage.create_task(session_id, input).await?)
    }
    .await;

    created_or_reply(result, state.error_detail)
}
