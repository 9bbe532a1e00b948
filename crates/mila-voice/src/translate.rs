//! Machine-translation collaborator.

use async_trait::async_trait;
use std::fmt;

const TRANSLATE_ENDPOINT: &str = "https://translation.googleapis.com/language/translate/v2";

#[derive(Debug)]
pub enum TranslationError {
    MissingApiKey,
    Http(String),
    Api { status: u16 },
    MalformedResponse,
}

impl fmt::Display for TranslationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslationError::MissingApiKey => write!(f, "translation api key is not configured"),
            TranslationError::Http(reason) => write!(f, "translation request failed: {}", reason),
            TranslationError::Api { status } => {
                write!(f, "translation service returned status {}", status)
            }
            TranslationError::MalformedResponse => {
                write!(f, "translation service returned an unexpected response shape")
            }
        }
    }
}

impl std::error::Error for TranslationError {}

/// Translates text into a target language. `source = None` means the service
/// auto-detects the source language.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(
        &self,
        text: &str,
        source: Option<&str>,
        target: &str,
    ) -> Result<String, TranslationError>;
}

/// Live client for the Google Translate v2 REST API.
pub struct GoogleTranslator {
    http: reqwest::Client,
    api_key: String,
}

impl GoogleTranslator {
    pub fn new(api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
        }
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(
        &self,
        text: &str,
        source: Option<&str>,
        target: &str,
    ) -> Result<String, TranslationError> {
        if self.api_key.is_empty() {
            return Err(TranslationError::MissingApiKey);
        }
        let mut params = vec![
            ("q", text),
            ("target", target),
            ("format", "text"),
            ("key", self.api_key.as_str()),
        ];
        // "auto" is the service default; only an explicit source is sent.
        if let Some(source) = source.filter(|s| *s != "auto") {
            params.push(("source", source));
        }
        tracing::debug!(target_lang = %target, "requesting translation");
        let response = self
            .http
            .post(TRANSLATE_ENDPOINT)
            .query(&params)
            .send()
            .await
            .map_err(|e| TranslationError::Http(e.to_string()))?;
        if !response.status().is_success() {
            return Err(TranslationError::Api {
                status: response.status().as_u16(),
            });
        }
        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| TranslationError::Http(e.to_string()))?;
        body["data"]["translations"][0]["translatedText"]
            .as_str()
            .map(str::to_string)
            .ok_or(TranslationError::MalformedResponse)
    }
}

/// Deterministic stand-in: tags the text with the target code.
pub struct MockTranslator;

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(
        &self,
        text: &str,
        _source: Option<&str>,
        target: &str,
    ) -> Result<String, TranslationError> {
        Ok(format!("[{}] {}", target, text))
    }
}
