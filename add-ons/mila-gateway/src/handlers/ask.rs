//! Typed assistant queries (the non-voice path to the matcher).

use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct AskRequest {
    pub query: String,
}

pub async fn ask(
    State(state): State<AppState>,
    Json(req): Json<AskRequest>,
) -> Json<serde_json::Value> {
    let kb = state.knowledge.lock().await;
    let reply = state.assistant.respond(&req.query, &kb);
    Json(serde_json::json!({
        "answer": reply.answer,
        "matched_question": reply.matched_question,
        "farewell": reply.farewell,
    }))
}
