// ABOUTME: Health check endpoint
// ABOUTME: Reports service version and whether the database answers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use serde_json::json;
use tracing::warn;

use crate::AppState;

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database_ok = match state.db.ping().await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "Health check could not reach the database");
            false
        }
    };

    let status = if database_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "status": if database_ok { "healthy" } else { "degraded" },
            "timestamp": Utc::now().timestamp(),
            "version": env!("CARGO_PKG_VERSION"),
            "service": "pagewise",
            "database": database_ok,
        })),
    )
}

