//! Speech-to-text collaborator and the audio capture seam.

use crate::AudioClip;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::fmt;
use tokio::sync::Mutex;

const RECOGNIZE_ENDPOINT: &str = "http://www.google.com/speech-api/v2/recognize";

#[derive(Debug)]
pub enum RecognitionError {
    /// The audio carried no intelligible speech. Not a loop-stopping failure.
    Unintelligible,
    /// The recognition service could not be reached.
    ServiceUnavailable,
    Failed(String),
}

impl fmt::Display for RecognitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecognitionError::Unintelligible => write!(f, "could not understand audio"),
            RecognitionError::ServiceUnavailable => write!(f, "speech service unavailable"),
            RecognitionError::Failed(reason) => write!(f, "speech recognition failed: {}", reason),
        }
    }
}

impl std::error::Error for RecognitionError {}

/// Turns a captured clip into recognized text.
#[async_trait]
pub trait SpeechToText: Send + Sync {
    async fn recognize(&self, clip: &AudioClip) -> Result<String, RecognitionError>;
}

/// Supplies audio clips to the listening loop. `Ok(None)` means no speech was
/// available this poll.
#[async_trait]
pub trait AudioSource: Send + Sync {
    async fn capture(&self) -> Result<Option<AudioClip>, RecognitionError>;
}

/// Live client for the Google full-duplex speech API.
pub struct GoogleRecognizer {
    http: reqwest::Client,
    api_key: String,
    language: String,
}

impl GoogleRecognizer {
    pub fn new(api_key: String) -> Self {
        Self::with_language(api_key, "en-us")
    }

    pub fn with_language(api_key: String, language: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            language: language.into(),
        }
    }
}

#[async_trait]
impl SpeechToText for GoogleRecognizer {
    async fn recognize(&self, clip: &AudioClip) -> Result<String, RecognitionError> {
        if self.api_key.is_empty() {
            return Err(RecognitionError::Failed(
                "speech api key is not configured".to_string(),
            ));
        }
        let response = self
            .http
            .post(RECOGNIZE_ENDPOINT)
            .query(&[
                ("client", "chromium"),
                ("lang", self.language.as_str()),
                ("key", self.api_key.as_str()),
            ])
            .header(reqwest::header::CONTENT_TYPE, clip.mime.as_str())
            .body(clip.bytes.clone())
            .send()
            .await
            .map_err(|_| RecognitionError::ServiceUnavailable)?;
        if !response.status().is_success() {
            return Err(RecognitionError::ServiceUnavailable);
        }
        let body = response
            .text()
            .await
            .map_err(|_| RecognitionError::ServiceUnavailable)?;
        // The service streams one JSON object per line; the first non-empty
        // result carries the transcript.
        for line in body.lines().filter(|l| !l.trim().is_empty()) {
            let parsed: serde_json::Value = match serde_json::from_str(line) {
                Ok(v) => v,
                Err(_) => continue,
            };
            if let Some(transcript) = parsed["result"][0]["alternative"][0]["transcript"].as_str()
            {
                return Ok(transcript.to_lowercase());
            }
        }
        Err(RecognitionError::Unintelligible)
    }
}

/// Deterministic stand-in: the clip bytes are the UTF-8 utterance.
pub struct MockRecognizer;

#[async_trait]
impl SpeechToText for MockRecognizer {
    async fn recognize(&self, clip: &AudioClip) -> Result<String, RecognitionError> {
        String::from_utf8(clip.bytes.clone())
            .map(|text| text.to_lowercase())
            .map_err(|_| RecognitionError::Unintelligible)
    }
}

/// Feedable audio source: clips are pushed in (by tests or the gateway's feed
/// endpoint) and popped one per capture poll.
#[derive(Default)]
pub struct QueuedAudioSource {
    queue: Mutex<VecDeque<AudioClip>>,
}

impl QueuedAudioSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn push(&self, clip: AudioClip) {
        self.queue.lock().await.push_back(clip);
    }

    pub async fn pending(&self) -> usize {
        self.queue.lock().await.len()
    }
}

#[async_trait]
impl AudioSource for QueuedAudioSource {
    async fn capture(&self) -> Result<Option<AudioClip>, RecognitionError> {
        Ok(self.queue.lock().await.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_recognizer_decodes_and_lowercases() {
        let clip = AudioClip::new(b"What Is Your Name".to_vec(), "text/plain");
        let text = MockRecognizer.recognize(&clip).await.unwrap();
        assert_eq!(text, "what is your name");
    }

    #[tokio::test]
    async fn mock_recognizer_rejects_non_utf8_as_unintelligible() {
        let clip = AudioClip::new(vec![0xff, 0xfe, 0x00], "audio/l16");
        let err = MockRecognizer.recognize(&clip).await.unwrap_err();
        assert!(matches!(err, RecognitionError::Unintelligible));
    }

    #[tokio::test]
    async fn queued_source_pops_in_order_then_runs_dry() {
        let source = QueuedAudioSource::new();
        source
            .push(AudioClip::new(b"first".to_vec(), "text/plain"))
            .await;
        source
            .push(AudioClip::new(b"second".to_vec(), "text/plain"))
            .await;

        assert_eq!(
            source.capture().await.unwrap().map(|c| c.bytes),
            Some(b"first".to_vec())
        );
        assert_eq!(
            source.capture().await.unwrap().map(|c| c.bytes),
            Some(b"second".to_vec())
        );
        assert_eq!(source.capture().await.unwrap(), None);
    }

    #[test]
    fn failure_strings_match_the_surfaced_statuses() {
        assert_eq!(
            RecognitionError::Unintelligible.to_string(),
            "could not understand audio"
        );
        assert_eq!(
            RecognitionError::ServiceUnavailable.to_string(),
            "speech service unavailable"
        );
    }
}
