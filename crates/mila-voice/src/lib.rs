//! Voice collaborators: translation, speech-to-text, and text-to-speech.
//!
//! Each collaborator is a trait seam with two providers: a deterministic mock
//! (the default; runs without keys or network) and a live HTTP client.

mod languages;
mod stt;
mod translate;
mod tts;

pub use languages::{code_for, is_supported, name_for, LANGUAGES};
pub use stt::{
    AudioSource, GoogleRecognizer, MockRecognizer, QueuedAudioSource, RecognitionError,
    SpeechToText,
};
pub use translate::{GoogleTranslator, MockTranslator, TranslationError, Translator};
pub use tts::{GoogleSynthesizer, MockSynthesizer, SynthesisError, TextToSpeech};

/// A captured or synthesized piece of audio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    pub bytes: Vec<u8>,
    /// Content type of `bytes`, e.g. `audio/mpeg` or `audio/l16; rate=16000`.
    pub mime: String,
}

impl AudioClip {
    pub fn new(bytes: Vec<u8>, mime: impl Into<String>) -> Self {
        Self {
            bytes,
            mime: mime.into(),
        }
    }

    /// An MP3 clip.
    pub fn mpeg(bytes: Vec<u8>) -> Self {
        Self::new(bytes, "audio/mpeg")
    }
}

/// Provider selection for all three collaborators: mock (simulated, default)
/// or live (external HTTP services, keys required).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ProviderMode {
    #[default]
    Mock,
    Live,
}

impl ProviderMode {
    /// Parses a config value; anything other than `"live"` is mock.
    pub fn parse(mode: &str) -> Self {
        match mode {
            "live" => ProviderMode::Live,
            _ => ProviderMode::Mock,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_parses_live_and_defaults_to_mock() {
        assert_eq!(ProviderMode::parse("live"), ProviderMode::Live);
        assert_eq!(ProviderMode::parse("mock"), ProviderMode::Mock);
        assert_eq!(ProviderMode::parse("anything"), ProviderMode::Mock);
    }
}
