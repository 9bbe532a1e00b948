//! Listening-loop control: start/stop, status, last spoken reply, and the
//! audio feed that stands in for a microphone.

use super::bad_request;
use crate::listener::ListenerSnapshot;
use crate::state::AppState;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use mila_voice::AudioClip;
use serde::Deserialize;

pub async fn start(State(state): State<AppState>) -> Json<serde_json::Value> {
    state.listener.start();
    Json(serde_json::json!({
        "status": "ok",
        "running": true,
        "greeting": state.assistant.greeting(),
    }))
}

pub async fn stop(State(state): State<AppState>) -> Json<serde_json::Value> {
    state.listener.stop();
    Json(serde_json::json!({ "status": "ok", "running": false }))
}

pub async fn status(State(state): State<AppState>) -> Json<ListenerSnapshot> {
    Json(state.listener.snapshot())
}

#[derive(Deserialize)]
pub struct FeedRequest {
    pub audio_b64: String,
    #[serde(default = "default_feed_mime")]
    pub mime: String,
}

fn default_feed_mime() -> String {
    "audio/l16; rate=16000".to_string()
}

/// Pushes a clip into the capture queue the loop polls from.
pub async fn feed(
    State(state): State<AppState>,
    Json(req): Json<FeedRequest>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    let bytes = BASE64
        .decode(req.audio_b64.as_bytes())
        .map_err(|_| bad_request("audio_b64 is not valid base64"))?;
    state.audio_source.push(AudioClip::new(bytes, req.mime)).await;
    Ok(Json(serde_json::json!({
        "status": "ok",
        "pending": state.audio_source.pending().await,
    })))
}

/// The most recently synthesized spoken reply, as raw audio.
pub async fn audio(State(state): State<AppState>) -> Result<Response, StatusCode> {
    match state.listener.last_audio().await {
        Some(clip) => Ok(([(header::CONTENT_TYPE, clip.mime)], clip.bytes).into_response()),
        None => Err(StatusCode::NOT_FOUND),
    }
}
