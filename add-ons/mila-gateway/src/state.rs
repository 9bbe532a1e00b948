//! Shared gateway state: one owner struct passed into every handler.

use crate::listener::ListenerHandle;
use mila_core::{AppConfig, Assistant, KnowledgeBase};
use mila_voice::{QueuedAudioSource, TextToSpeech, Translator};
use std::sync::Arc;
use tokio::sync::Mutex;

/// All handler dependencies. The knowledge base sits behind a single mutex:
/// every mutation, whether from an HTTP handler or the listening loop, is
/// serialized through it.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub knowledge: Arc<Mutex<KnowledgeBase>>,
    pub assistant: Arc<Assistant>,
    pub translator: Arc<dyn Translator>,
    pub synthesizer: Arc<dyn TextToSpeech>,
    pub audio_source: Arc<QueuedAudioSource>,
    pub saved_texts: Arc<Mutex<Vec<String>>>,
    pub listener: ListenerHandle,
}
