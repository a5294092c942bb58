// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

use crate::store::StoreError;

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
///
/// Whatever the HTTP status, the body always carries `status: "error"`:
/// the legacy clients key off the body field, not the transport code.
#[derive(Debug)]
pub enum AppError {
    // 500 Internal Server Error
    InternalServerError(String),

    // 400 Bad Request
    BadRequest(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict: a second submission for the same (survey, student) pair.
    // Carries the fixed marker message clients match on.
    DuplicateSubmission,

    // 500, the backing workbook file cannot be read or written
    StoreUnavailable(String),

    // 503, the request-wide lock was not acquired within the bound
    LockTimeout,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for AppError {}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "status": "error", "error": msg }),
                )
            }
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                json!({ "status": "error", "error": msg }),
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                json!({ "status": "error", "error": msg }),
            ),
            AppError::DuplicateSubmission => (
                StatusCode::CONFLICT,
                json!({ "status": "error", "message": "Duplicate submission" }),
            ),
            AppError::StoreUnavailable(msg) => {
                tracing::error!("Store unavailable: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "status": "error", "error": msg }),
                )
            }
            AppError::LockTimeout => (
                StatusCode::SERVICE_UNAVAILABLE,
                json!({ "status": "error", "error": "Request lock not acquired within the timeout" }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

/// Converts `StoreError` into `AppError::StoreUnavailable`.
/// Allows using `?` operator on workbook loads and saves.
impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::StoreUnavailable(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::BadRequest(err.to_string())
    }
}
