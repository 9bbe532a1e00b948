//! Saved input texts: session-scoped, index-addressed, not persisted.

use super::bad_request;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct SaveTextRequest {
    pub text: String,
}

pub async fn list(State(state): State<AppState>) -> Json<serde_json::Value> {
    let texts = state.saved_texts.lock().await;
    Json(serde_json::json!({ "count": texts.len(), "texts": texts.clone() }))
}

pub async fn save(
    State(state): State<AppState>,
    Json(req): Json<SaveTextRequest>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    if req.text.trim().is_empty() {
        return Err(bad_request("enter some text to save"));
    }
    let mut texts = state.saved_texts.lock().await;
    texts.push(req.text);
    Ok(Json(serde_json::json!({ "status": "ok", "count": texts.len() })))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    let mut texts = state.saved_texts.lock().await;
    if index >= texts.len() {
        return Err((
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({
                "status": "error",
                "message": format!("no saved text at index {}", index),
            })),
        ));
    }
    texts.remove(index);
    Ok(Json(serde_json::json!({ "status": "ok", "count": texts.len() })))
}
