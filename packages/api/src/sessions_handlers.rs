// ABOUTME: HTTP request handlers for sessions
// ABOUTME: Creates sessions and resolves the session id shared by nested collection routes

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Response,
    Json,
};
use pagewise_storage::{Session, SessionCreateInput};
use tracing::info;
use uuid::Uuid;

use crate::error::{ApiResult, AppError};
use crate::response::{created_or_reply, ok_or_reply};
use crate::AppState;

/// Parse a session id from the path
pub(crate) fn parse_session_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::try_parse(raw).map_err(|_| AppError::validation(format!("invalid session id '{raw}'")))
}

/// Parse the session id and confirm the session exists
pub(crate) async fn resolve_session(state: &AppState, raw: &str) -> ApiResult<Uuid> {
    let session_id = parse_session_id(raw)?;
    state.db.session_storage.ensure_exists(session_id).await?;
    Ok(session_id)
}

/// Create a new session
pub async fn create_session(
    State(state): State<AppState>,
    body: Result<Json<SessionCreateInput>, JsonRejection>,
) -> Response {
    let result = async {
        let Json(input) = body.map_err(|e| AppError::validation(e.body_text()))?;
        info!("Creating session: {:?}", input.title);
        Ok::<Session, AppError>(state.db.session_storage.create_session(input).await?)
    }
    .await;

    created_or_reply(result, state.error_detail)
}

/// Get a single session by ID
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Response {
    let result = async {
        let session_id = parse_session_id(&session_id)?;
        Ok::<Session, AppError>(state.db.session_storage.get_session(session_id).await?)
    }
    .await;

    ok_or_reply(result, state.error_detail)
}
