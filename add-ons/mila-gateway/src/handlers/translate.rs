//! Translate-and-speak: the original page's one-shot action over N target
//! languages. A failing language is reported in its own result slot; the
//! remaining languages still translate.

use super::bad_request;
use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};

/// Input cap carried over from the original UI.
const TEXT_LIMIT_CHARS: usize = 250;

#[derive(Deserialize)]
pub struct TranslateRequest {
    pub text: String,
    pub targets: Vec<String>,
    /// Also synthesize each translation and inline it as base64 MP3.
    #[serde(default)]
    pub speak: bool,
}

#[derive(Serialize)]
pub struct TranslationResult {
    pub language: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_b64: Option<String>,
}

pub async fn translate(
    State(state): State<AppState>,
    Json(req): Json<TranslateRequest>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    let text = req.text.trim();
    if text.is_empty() {
        return Err(bad_request("enter some text to translate"));
    }
    if text.chars().count() > TEXT_LIMIT_CHARS {
        return Err(bad_request(format!(
            "text exceeds the {} character limit",
            TEXT_LIMIT_CHARS
        )));
    }
    if req.targets.is_empty() {
        return Err(bad_request("select at least one target language"));
    }
    if let Some(unknown) = req.targets.iter().find(|c| !mila_voice::is_supported(c)) {
        return Err(bad_request(format!("unsupported language code: {}", unknown)));
    }

    let mut results = Vec::with_capacity(req.targets.len());
    for code in &req.targets {
        let language = mila_voice::name_for(code)
            .map(str::to_string)
            .unwrap_or_else(|| code.clone());
        match state.translator.translate(text, None, code).await {
            Ok(translated) => {
                let (audio_b64, error) = if req.speak {
                    match state.synthesizer.synthesize(&translated, code).await {
                        Ok(clip) => (Some(BASE64.encode(&clip.bytes)), None),
                        Err(e) => {
                            tracing::warn!(code = %code, error = %e, "synthesis failed");
                            (None, Some(format!("synthesis failed: {}", e)))
                        }
                    }
                } else {
                    (None, None)
                };
                results.push(TranslationResult {
                    language,
                    code: code.clone(),
                    text: Some(translated),
                    error,
                    audio_b64,
                });
            }
            Err(e) => {
                tracing::warn!(code = %code, error = %e, "translation failed");
                results.push(TranslationResult {
                    language,
                    code: code.clone(),
                    text: None,
                    error: Some(e.to_string()),
                    audio_b64: None,
                });
            }
        }
    }

    Ok(Json(serde_json::json!({
        "status": "ok",
        "text": text,
        "results": results,
    })))
}
