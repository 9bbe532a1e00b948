//! Application configuration. Load from TOML or env.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Global application configuration (gateway + voice stack).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application identity shown in health/status responses.
    pub app_name: String,
    /// HTTP port for the gateway.
    pub port: u16,
    /// Base directory for persisted state (`data.csv`, `token_data.json`).
    pub storage_path: String,
    /// Voice collaborator mode: "mock" or "live".
    pub voice_mode: String,
    /// Poll interval of the background listening loop, in milliseconds.
    pub listen_poll_ms: u64,
    /// Backoff after a listening-loop failure, in milliseconds.
    pub listen_backoff_ms: u64,
    /// Wake phrases a spoken query must contain before it is processed.
    #[serde(default = "default_wake_phrases")]
    pub wake_phrases: Vec<String>,
    /// API key for the live translation collaborator. (Env: `MILA_TRANSLATE_API_KEY`)
    #[serde(default)]
    pub translate_api_key: Option<String>,
    /// API key for the live speech-recognition collaborator. (Env: `MILA_SPEECH_API_KEY`)
    #[serde(default)]
    pub speech_api_key: Option<String>,
}

fn default_wake_phrases() -> Vec<String> {
    ["hey mila", "okay mila", "mila"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

impl AppConfig {
    /// Load config from file and environment. Precedence: env `MILA_CONFIG`
    /// path > `config/mila.toml` > defaults.
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path =
            std::env::var("MILA_CONFIG").unwrap_or_else(|_| "config/mila".to_string());
        let builder = config::Config::builder()
            .set_default("app_name", "Mila Voice Assistant")?
            .set_default("port", 8090_i64)?
            .set_default("storage_path", "./data")?
            .set_default("voice_mode", "mock")?
            .set_default("listen_poll_ms", 100_i64)?
            .set_default("listen_backoff_ms", 1000_i64)?;

        let path = Path::new(&config_path);
        let builder = if path.exists() {
            builder.add_source(config::File::from(path))
        } else {
            builder
        };

        let built = builder
            .add_source(config::Environment::with_prefix("MILA").separator("__"))
            .build()?;

        built.try_deserialize()
    }

    /// Path of the persisted question/answer table.
    pub fn data_file(&self) -> PathBuf {
        Path::new(&self.storage_path).join("data.csv")
    }

    /// Path of the token training-data export.
    pub fn token_export_file(&self) -> PathBuf {
        Path::new(&self.storage_path).join("token_data.json")
    }
}
