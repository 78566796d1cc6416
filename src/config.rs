//! Configuration loading and management

use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_NAME: &str = "ERROR";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_SESSION_TIMEOUT_SECS: u64 = 300;

/// Assistant configuration, built once at startup and never mutated
#[derive(Clone)]
pub struct Config {
    /// Name the assistant answers with
    pub name: String,

    /// Base URL of the remote intent classifier (empty = disabled)
    pub api_base_url: String,

    /// Bearer token for the remote classifier
    pub api_key: String,

    /// Directory holding the persisted JSON documents
    pub data_dir: PathBuf,

    /// Fallback log filter when `RUST_LOG` is unset
    pub log_level: String,

    /// Seconds of inactivity before an unlocked session expires
    pub session_timeout_secs: u64,

    /// Hex SHA-256 of the unlock password (empty = password auth disabled)
    pub password_hash: String,

    /// Spoken unlock phrase (empty = voice auth disabled)
    pub voice_passphrase: String,

    /// Root directory for file searches
    pub search_root: PathBuf,
}

impl Config {
    /// Load configuration from environment and defaults
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).unwrap_or_default();

        let session_timeout_secs = match lookup("ERROR_SESSION_TIMEOUT") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("invalid ERROR_SESSION_TIMEOUT: {raw:?}"))?,
            None => DEFAULT_SESSION_TIMEOUT_SECS,
        };

        let data_dir = lookup("ERROR_DATA_DIR")
            .map(PathBuf::from)
            .or_else(|| dirs::data_dir().map(|dir| dir.join("error-assistant")))
            .unwrap_or_else(|| PathBuf::from("data"));

        let search_root = lookup("ERROR_SEARCH_ROOT")
            .map(PathBuf::from)
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self {
            name: lookup("ERROR_ASSISTANT_NAME").unwrap_or_else(|| DEFAULT_NAME.to_string()),
            api_base_url: var("ERROR_API_BASE_URL"),
            api_key: var("ERROR_API_KEY"),
            data_dir,
            log_level: lookup("ERROR_LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            session_timeout_secs,
            password_hash: var("ERROR_PASSWORD_HASH"),
            voice_passphrase: var("ERROR_VOICE_PASSPHRASE"),
            search_root,
        })
    }

    /// Path of the preferences document
    pub fn preferences_path(&self) -> PathBuf {
        self.data_dir.join("preferences.json")
    }

    /// Path of the interaction context document
    pub fn context_path(&self) -> PathBuf {
        self.data_dir.join("context.json")
    }
}

// Hand-written so secrets never reach the logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("name", &self.name)
            .field("api_base_url", &self.api_base_url)
            .field("data_dir", &self.data_dir)
            .field("log_level", &self.log_level)
            .field("session_timeout_secs", &self.session_timeout_secs)
            .field("password_configured", &!self.password_hash.is_empty())
            .field("voice_configured", &!self.voice_passphrase.is_empty())
            .field("search_root", &self.search_root)
            .finish()
    }
}
