// ABOUTME: HTTP request handlers for session messages
// ABOUTME: Cursor-paged message history and message creation

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    response::Response,
    Json,
};
use pagewise_core::{ListExecutor, Page};
use pagewise_storage::{Message, MessageCreateInput};
use tracing::info;

use crate::error::{ApiResult, AppError};
use crate::pagination::ListQuery;
use crate::response::{created_or_reply, ok_or_reply};
use crate::sessions_handlers::resolve_session;
use crate::AppState;

/// List one page of a session's messages
pub async fn list_messages(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Response {
    let result = list_session_messages(&state, &session_id, query).await;
    ok_or_reply(result, state.error_detail)
}

async fn list_session_messages(
    state: &AppState,
    session_id: &str,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Page<Message>> {
    let Query(query) = query.map_err(|e| AppError::validation(e.body_text()))?;
    let request = query.into_page_request()?;
    let session_id = resolve_session(state, session_id).await?;

    info!(
        "Listing messages for session: {} (limit: {}, direction: {:?})",
        session_id, request.limit, request.direction
    );

    let executor = ListExecutor::new(state.db.message_storage.session(session_id));
    Ok(executor.list(&request).await?)
}

/// Append a message to a session
pub async fn create_message(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    body: Result<Json<MessageCreateInput>, JsonRejection>,
) -> Response {
    let result = async {
        let Json(input) = body.map_err(|e| AppError::validation(e.body_text()))?;
        let session_id = resolve_session(&state, &session_id).await?;
        if let Some(task_id) = input.task_id {
            let task = state.db.task_storage.get_task(task_id).await?;
            if task.session_id != session_id {
                return Err(AppError::validation(format!(
                    "task {task_id} belongs to another session"
                )));
            }
        }
        info!("Creating {:?} message for session: {}", input.role, session_id);
        Ok::<Message, AppError>(
            state
                .db
                .message_storage
                .create_message(session_id, input)
                .await?,
        )
    }
    .await;

    created_or_reply(result, state.error_detail)
}
