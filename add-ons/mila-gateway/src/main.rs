//! Axum-based API gateway for the Mila voice assistant. Config-driven via
//! AppConfig; voice collaborators are selected by the mock/live provider mode.

mod handlers;
mod listener;
mod state;

use axum::extract::State;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use mila_core::{AppConfig, Assistant, KnowledgeBase};
use mila_voice::{
    AudioSource, GoogleRecognizer, GoogleSynthesizer, GoogleTranslator, MockRecognizer,
    MockSynthesizer, MockTranslator, ProviderMode, QueuedAudioSource, SpeechToText, TextToSpeech,
    Translator,
};
use state::AppState;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Pre-flight check: storage usable and port available.
fn run_verify() -> Result<(), String> {
    let config = AppConfig::load().map_err(|e| format!("Config load failed: {}", e))?;

    print!("Checking storage at {}... ", config.storage_path);
    std::fs::create_dir_all(&config.storage_path)
        .map_err(|e| format!("storage dir inaccessible: {}", e))?;
    let kb = KnowledgeBase::open(config.data_file())
        .map_err(|e| format!("data table unreadable: {}", e))?;
    kb.ensure_data_file()
        .map_err(|e| format!("data table not writable: {}", e))?;
    println!("OK ({} entries)", kb.len());

    print!("Checking port {}... ", config.port);
    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], config.port));
    match std::net::TcpListener::bind(addr) {
        Ok(listener) => {
            drop(listener);
            println!("OK (available)");
        }
        Err(e) => return Err(format!("Port {} blocked: {}", config.port, e)),
    }

    println!("\nAll checks passed. Ready to start the gateway.");
    Ok(())
}

#[tokio::main]
async fn main() {
    // Load .env file if present (before any env::var calls)
    if let Err(e) = dotenvy::dotenv() {
        eprintln!(
            "[mila-gateway] .env not loaded: {} (using system environment)",
            e
        );
    }

    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--verify") {
        match run_verify() {
            Ok(()) => std::process::exit(0),
            Err(e) => {
                eprintln!("Pre-flight failed: {}", e);
                std::process::exit(1);
            }
        }
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().expect("load AppConfig");
    let state = build_state(config).expect("initialize gateway state");
    let port = state.config.port;
    let app_name = state.config.app_name.clone();
    let app = build_app(state);

    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], port));
    tracing::info!("{} listening on {}", app_name, addr);
    axum::serve(tokio::net::TcpListener::bind(addr).await.unwrap(), app)
        .await
        .unwrap();
}

fn build_state(config: AppConfig) -> Result<AppState, Box<dyn std::error::Error + Send + Sync>> {
    std::fs::create_dir_all(&config.storage_path)?;
    let knowledge = KnowledgeBase::open(config.data_file())?;
    knowledge.ensure_data_file()?;
    let knowledge = Arc::new(Mutex::new(knowledge));
    let assistant = Arc::new(Assistant::new(config.wake_phrases.clone()));
    let audio_source = Arc::new(QueuedAudioSource::new());

    let mode = ProviderMode::parse(&config.voice_mode);
    let (translator, synthesizer, recognizer): (
        Arc<dyn Translator>,
        Arc<dyn TextToSpeech>,
        Arc<dyn SpeechToText>,
    ) = match mode {
        ProviderMode::Live => (
            Arc::new(GoogleTranslator::new(
                config.translate_api_key.clone().unwrap_or_default(),
            )),
            Arc::new(GoogleSynthesizer::new()),
            Arc::new(GoogleRecognizer::new(
                config.speech_api_key.clone().unwrap_or_default(),
            )),
        ),
        ProviderMode::Mock => (
            Arc::new(MockTranslator),
            Arc::new(MockSynthesizer),
            Arc::new(MockRecognizer),
        ),
    };
    tracing::info!(mode = ?mode, "voice providers initialized");

    let listener = listener::spawn(
        Arc::clone(&knowledge),
        Arc::clone(&assistant),
        Arc::clone(&audio_source) as Arc<dyn AudioSource>,
        recognizer,
        Arc::clone(&synthesizer),
        Duration::from_millis(config.listen_poll_ms),
        Duration::from_millis(config.listen_backoff_ms),
    );

    Ok(AppState {
        config: Arc::new(config),
        knowledge,
        assistant,
        translator,
        synthesizer,
        audio_source,
        saved_texts: Arc::new(Mutex::new(Vec::new())),
        listener,
    })
}

fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/v1/health", get(health))
        .route("/v1/languages", get(languages))
        .route("/v1/translate", post(handlers::translate::translate))
        .route(
            "/v1/knowledge",
            get(handlers::knowledge::list).post(handlers::knowledge::add),
        )
        .route("/v1/knowledge/export", post(handlers::knowledge::export))
        .route("/v1/knowledge/:question", delete(handlers::knowledge::remove))
        .route("/v1/ask", post(handlers::ask::ask))
        .route("/v1/listener/start", post(handlers::listener::start))
        .route("/v1/listener/stop", post(handlers::listener::stop))
        .route("/v1/listener/status", get(handlers::listener::status))
        .route("/v1/listener/audio", get(handlers::listener::audio))
        .route("/v1/listener/feed", post(handlers::listener::feed))
        .route(
            "/v1/texts",
            get(handlers::texts::list).post(handlers::texts::save),
        )
        .route("/v1/texts/:index", delete(handlers::texts::remove))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let entries = state.knowledge.lock().await.len();
    Json(serde_json::json!({
        "app": state.config.app_name,
        "version": env!("CARGO_PKG_VERSION"),
        "status": "ok",
        "knowledge_entries": entries,
        "listening": state.listener.is_running(),
    }))
}

async fn languages() -> Json<serde_json::Value> {
    let languages: Vec<serde_json::Value> = mila_voice::LANGUAGES
        .iter()
        .map(|(name, code)| serde_json::json!({ "name": name, "code": code }))
        .collect();
    Json(serde_json::json!({ "languages": languages }))
}
