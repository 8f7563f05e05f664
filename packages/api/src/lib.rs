// ABOUTME: HTTP API layer for pagewise providing REST endpoints and routing
// ABOUTME: Exposes cursor-paged session collections over the storage layer

use axum::{
    routing::{get, post},
    Router,
};
use pagewise_storage::DbState;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

pub mod error;
pub mod health;
pub mod messages_handlers;
pub mod pagination;
pub mod response;
pub mod sessions_handlers;
pub mod tasks_handlers;

pub use error::{ApiResult, AppError, ErrorDetail, ErrorReply};
pub use pagination::ListQuery;
pub use response::ApiResponse;

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub db: DbState,
    /// Whether error bodies include the underlying error text
    pub error_detail: ErrorDetail,
}

impl AppState {
    pub fn new(db: DbState, error_detail: ErrorDetail) -> Self {
        Self { db, error_detail }
    }
}

/// Creates the session collection routes
pub fn create_sessions_router() -> Router<AppState> {
    Router::new()
        .route("/api/sessions", post(sessions_handlers::create_session))
        .route(
            "/api/sessions/{session_id}",
            get(sessions_handlers::get_session),
        )
        .route(
            "/api/sessions/{session_id}/tasks",
            get(tasks_handlers::list_tasks).post(tasks_handlers::create_task),
        )
        .route(
            "/api/sessions/{session_id}/messages",
            get(messages_handlers::list_messages).post(messages_handlers::create_message),
        )
}

/// Creates the full API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health_check))
        .merge(create_sessions_router())
        .with_state(state)
}

/// The API router wrapped in request tracing and a per-request timeout.
///
/// A request that runs past `request_timeout` is answered with 408 and its
/// handler future is dropped, cancelling any in-flight storage read.
pub fn create_app(state: AppState, request_timeout: Duration) -> Router {
    create_router(state)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
}
