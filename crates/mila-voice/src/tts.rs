//! Text-to-speech collaborator.

use crate::AudioClip;
use async_trait::async_trait;
use std::fmt;

const TTS_ENDPOINT: &str = "https://translate.google.com/translate_tts";

#[derive(Debug)]
pub enum SynthesisError {
    Http(String),
    Api { status: u16 },
}

impl fmt::Display for SynthesisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SynthesisError::Http(reason) => write!(f, "speech synthesis failed: {}", reason),
            SynthesisError::Api { status } => {
                write!(f, "speech synthesis service returned status {}", status)
            }
        }
    }
}

impl std::error::Error for SynthesisError {}

/// Synthesizes text into a playable clip in the given language.
#[async_trait]
pub trait TextToSpeech: Send + Sync {
    async fn synthesize(&self, text: &str, lang: &str) -> Result<AudioClip, SynthesisError>;
}

/// Live client for the Google Translate TTS endpoint (MP3 out).
pub struct GoogleSynthesizer {
    http: reqwest::Client,
}

impl GoogleSynthesizer {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }
}

impl Default for GoogleSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextToSpeech for GoogleSynthesizer {
    async fn synthesize(&self, text: &str, lang: &str) -> Result<AudioClip, SynthesisError> {
        tracing::debug!(lang = %lang, "requesting speech synthesis");
        let response = self
            .http
            .get(TTS_ENDPOINT)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", lang),
                ("q", text),
            ])
            .send()
            .await
            .map_err(|e| SynthesisError::Http(e.to_string()))?;
        if !response.status().is_success() {
            return Err(SynthesisError::Api {
                status: response.status().as_u16(),
            });
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| SynthesisError::Http(e.to_string()))?;
        Ok(AudioClip::mpeg(bytes.to_vec()))
    }
}

/// Deterministic stand-in: emits a stub payload tagged with language and text.
pub struct MockSynthesizer;

#[async_trait]
impl TextToSpeech for MockSynthesizer {
    async fn synthesize(&self, text: &str, lang: &str) -> Result<AudioClip, SynthesisError> {
        Ok(AudioClip::mpeg(
            format!("MP3:{}:{}", lang, text).into_bytes(),
        ))
    }
}
