//! Knowledge-base management: list, add, delete, token export.

use super::internal_error;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct AddRequest {
    pub question: String,
    pub answer: String,
}

pub async fn list(State(state): State<AppState>) -> Json<serde_json::Value> {
    let kb = state.knowledge.lock().await;
    let entries: Vec<serde_json::Value> = kb
        .iter()
        .map(|(question, answer)| serde_json::json!({ "question": question, "answer": answer }))
        .collect();
    Json(serde_json::json!({ "count": entries.len(), "entries": entries }))
}

pub async fn add(
    State(state): State<AppState>,
    Json(req): Json<AddRequest>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    let mut kb = state.knowledge.lock().await;
    kb.add(&req.question, &req.answer).map_err(internal_error)?;
    Ok(Json(serde_json::json!({ "status": "ok", "count": kb.len() })))
}

/// Deletes by the exact normalized key; an unknown key reports
/// `deleted: false` rather than an error.
pub async fn remove(
    State(state): State<AppState>,
    Path(question): Path<String>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    let mut kb = state.knowledge.lock().await;
    let deleted = kb.remove(&question).map_err(internal_error)?;
    Ok(Json(serde_json::json!({ "status": "ok", "deleted": deleted })))
}

pub async fn export(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    let kb = state.knowledge.lock().await;
    let path = state.config.token_export_file();
    let count = kb.export_token_data(&path).map_err(internal_error)?;
    Ok(Json(serde_json::json!({
        "status": "ok",
        "count": count,
        "path": path.display().to_string(),
    })))
}
