//! Background listening loop: capture → recognize → wake-phrase gate →
//! answer → synthesize.
//!
//! One loop per process, spawned at startup. The run flag and the status
//! snapshot both travel over `watch` channels, so starting and stopping is a
//! plain send checked at each iteration boundary and readers never block the
//! loop.

use mila_core::{Assistant, KnowledgeBase};
use mila_voice::{AudioClip, AudioSource, RecognitionError, SpeechToText, TextToSpeech};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};

/// What the status endpoint reports about the loop.
#[derive(Debug, Clone, Serialize)]
pub struct ListenerSnapshot {
    pub running: bool,
    pub status: String,
    pub recognized_text: String,
    pub last_response: String,
}

impl Default for ListenerSnapshot {
    fn default() -> Self {
        Self {
            running: false,
            status: "Listening stopped".to_string(),
            recognized_text: String::new(),
            last_response: String::new(),
        }
    }
}

/// Control handle held by the gateway state.
#[derive(Clone)]
pub struct ListenerHandle {
    run: Arc<watch::Sender<bool>>,
    status: watch::Receiver<ListenerSnapshot>,
    last_audio: Arc<Mutex<Option<AudioClip>>>,
}

impl ListenerHandle {
    pub fn start(&self) {
        let _ = self.run.send(true);
    }

    pub fn stop(&self) {
        let _ = self.run.send(false);
    }

    pub fn is_running(&self) -> bool {
        *self.run.borrow()
    }

    /// Current state, with `running` reflecting the flag immediately rather
    /// than waiting for the loop's next tick.
    pub fn snapshot(&self) -> ListenerSnapshot {
        let mut snapshot = self.status.borrow().clone();
        snapshot.running = *self.run.borrow();
        snapshot
    }

    /// The most recently synthesized spoken reply.
    pub async fn last_audio(&self) -> Option<AudioClip> {
        self.last_audio.lock().await.clone()
    }
}

/// Spawns the loop (initially stopped) and returns its control handle.
pub fn spawn(
    knowledge: Arc<Mutex<KnowledgeBase>>,
    assistant: Arc<Assistant>,
    source: Arc<dyn AudioSource>,
    recognizer: Arc<dyn SpeechToText>,
    synthesizer: Arc<dyn TextToSpeech>,
    poll: Duration,
    backoff: Duration,
) -> ListenerHandle {
    let (run_tx, run_rx) = watch::channel(false);
    let (status_tx, status_rx) = watch::channel(ListenerSnapshot::default());
    let last_audio = Arc::new(Mutex::new(None));

    let task = ListenerTask {
        knowledge,
        assistant,
        source,
        recognizer,
        synthesizer,
        backoff,
        run_rx,
        status_tx,
        last_audio: Arc::clone(&last_audio),
    };
    tokio::spawn(task.run(poll));

    ListenerHandle {
        run: Arc::new(run_tx),
        status: status_rx,
        last_audio,
    }
}

struct ListenerTask {
    knowledge: Arc<Mutex<KnowledgeBase>>,
    assistant: Arc<Assistant>,
    source: Arc<dyn AudioSource>,
    recognizer: Arc<dyn SpeechToText>,
    synthesizer: Arc<dyn TextToSpeech>,
    backoff: Duration,
    run_rx: watch::Receiver<bool>,
    status_tx: watch::Sender<ListenerSnapshot>,
    last_audio: Arc<Mutex<Option<AudioClip>>>,
}

impl ListenerTask {
    async fn run(self, poll: Duration) {
        tracing::info!(
            target: "mila::listener",
            poll_ms = poll.as_millis() as u64,
            "listening loop started"
        );
        let mut interval = tokio::time::interval(poll);
        loop {
            interval.tick().await;
            if !*self.run_rx.borrow() {
                if self.status_tx.borrow().running {
                    self.status_tx.send_modify(|s| {
                        s.running = false;
                        s.status = "Listening stopped".to_string();
                    });
                    tracing::info!(target: "mila::listener", "listening stopped");
                }
                continue;
            }
            if !self.status_tx.borrow().running {
                self.status_tx.send_modify(|s| {
                    s.running = true;
                    s.status = "Starting to listen...".to_string();
                });
                tracing::info!(target: "mila::listener", "listening started");
            }
            if let Err(e) = self.tick().await {
                self.status_tx
                    .send_modify(|s| s.status = format!("Listening error: {}", e));
                tracing::warn!(target: "mila::listener", error = %e, "listen tick failed");
                tokio::time::sleep(self.backoff).await;
            }
        }
    }

    async fn tick(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.status_tx
            .send_modify(|s| s.status = "Listening...".to_string());
        let clip = match self.source.capture().await? {
            Some(clip) => clip,
            None => return Ok(()),
        };

        self.status_tx
            .send_modify(|s| s.status = "Recognizing...".to_string());
        let text = match self.recognizer.recognize(&clip).await {
            Ok(text) => text,
            // Unintelligible speech is routine: surface it and keep polling
            // without the failure backoff.
            Err(e @ RecognitionError::Unintelligible) => {
                self.status_tx.send_modify(|s| s.status = e.to_string());
                return Ok(());
            }
            Err(e) => return Err(Box::new(e)),
        };
        self.status_tx.send_modify(|s| {
            s.status = format!("Recognized: {}", text);
            s.recognized_text = text.clone();
        });

        let query = match self.assistant.strip_wake_phrase(&text) {
            Some(query) => query,
            None => return Ok(()),
        };
        let reply = {
            let kb = self.knowledge.lock().await;
            self.assistant.respond(&query, &kb)
        };
        self.status_tx
            .send_modify(|s| s.last_response = reply.answer.clone());

        let spoken = self.synthesizer.synthesize(&reply.answer, "en").await?;
        *self.last_audio.lock().await = Some(spoken);
        tracing::info!(
            target: "mila::listener",
            query = %query,
            matched = reply.matched_question.is_some(),
            "voice query answered"
        );
        Ok(())
    }
}
