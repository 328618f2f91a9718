use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::editor::autosave::DEFAULT_DEBOUNCE;

/// Application configuration loaded from environment variables.
/// Everything has a default; malformed numbers fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub port: u16,
    pub rust_log: String,
    pub autosave_debounce_ms: u64,
    pub enable_ai: bool,
    pub openai_api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Config {
            data_dir: var("CV_STUDIO_DATA_DIR")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./data")),
            port: var("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            autosave_debounce_ms: match var("AUTOSAVE_DEBOUNCE_MS") {
                Some(raw) => raw
                    .parse::<u64>()
                    .context("AUTOSAVE_DEBOUNCE_MS must be a whole number of milliseconds")?,
                None => DEFAULT_DEBOUNCE.as_millis() as u64,
            },
            enable_ai: parse_flag(var("ENABLE_AI").as_deref()),
            openai_api_key: var("OPENAI_API_KEY")
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty()),
        })
    }

    pub fn autosave_debounce(&self) -> Duration {
        Duration::from_millis(self.autosave_debounce_ms)
    }

    /// Suggestions need both the switch and a key.
    pub fn ai_enabled(&self) -> bool {
        self.enable_ai && self.openai_api_key.is_some()
    }
}

/// Off unless explicitly one of `1`, `true`, `yes`, `on` (any case).
fn parse_flag(raw: Option<&str>) -> bool {
    matches!(
        raw.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("1" | "true" | "yes" | "on")
    )
}
