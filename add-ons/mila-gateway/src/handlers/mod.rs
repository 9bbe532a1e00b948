//! HTTP handlers, one module per resource.

pub mod ask;
pub mod knowledge;
pub mod listener;
pub mod texts;
pub mod translate;

use axum::http::StatusCode;
use axum::Json;

pub(crate) fn bad_request(message: impl Into<String>) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "status": "error", "message": message.into() })),
    )
}

pub(crate) fn internal_error(
    error: impl std::fmt::Display,
) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "status": "error", "message": error.to_string() })),
    )
}
