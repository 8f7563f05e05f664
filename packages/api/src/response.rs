// ABOUTME: Shared API response types
// ABOUTME: Provides the success envelope and helpers that render handler results

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;

use crate::error::{ApiResult, ErrorDetail};

/// Standard API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

fn with_status_or_reply<T: Serialize>(
    status: StatusCode,
    result: ApiResult<T>,
    detail: ErrorDetail,
) -> Response {
    match result {
        Ok(data) => (status, Json(ApiResponse::success(data))).into_response(),
        Err(err) => err.reply(detail).into_response(),
    }
}

/// 200 with the success envelope, or the rendered error
pub fn ok_or_reply<T: Serialize>(result: ApiResult<T>, detail: ErrorDetail) -> Response {
    with_status_or_reply(StatusCode::OK, result, detail)
}

/// 201 with the success envelope, or the rendered error
pub fn created_or_reply<T: Serialize>(result: ApiResult<T>, detail: ErrorDetail) -> Response {
    with_status_or_reply(StatusCode::CREATED, result, detail)
}
