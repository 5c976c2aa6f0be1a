//! Configuration management for CampusBuddy
//!
//! Loads and saves assistant settings from the user's config directory.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

pub mod paths;

pub use paths::{campus_data_dir, config_path, data_dir, sessions_dir};

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config not found: {0}")]
    NotFound(PathBuf),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Credentials for one completion backend
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProviderConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

/// All completion backends
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub openrouter: ProviderConfig,
    #[serde(default)]
    pub openai: ProviderConfig,
}

/// Assistant defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantDefaults {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_turns")]
    pub max_turns: u32,
    #[serde(default = "default_session_max_messages")]
    pub session_max_messages: usize,
    #[serde(default = "default_history_messages")]
    pub history_messages: usize,
}

impl Default for AssistantDefaults {
    fn default() -> Self {
        Self {
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            max_turns: default_max_turns(),
            session_max_messages: default_session_max_messages(),
            history_messages: default_history_messages(),
        }
    }
}

fn default_model() -> String {
    "anthropic/claude-sonnet-4".to_string()
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_temperature() -> f32 {
    0.7
}

// Conversation-loop ceiling: model round-trips per chat message.
fn default_max_turns() -> u32 {
    5
}

fn default_session_max_messages() -> usize {
    100
}

fn default_history_messages() -> usize {
    20
}

/// Guest chat limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestConfig {
    #[serde(default = "default_guest_max_messages")]
    pub max_messages: usize,
    #[serde(default = "default_guest_window_hours")]
    pub window_hours: i64,
}

impl Default for GuestConfig {
    fn default() -> Self {
        Self {
            max_messages: default_guest_max_messages(),
            window_hours: default_guest_window_hours(),
        }
    }
}

fn default_guest_max_messages() -> usize {
    5
}

fn default_guest_window_hours() -> i64 {
    4
}

/// Root configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub assistant: AssistantDefaults,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub guest: GuestConfig,
}

impl Config {
    /// Load from the default location
    pub async fn load() -> Result<Self> {
        let path = config_path();
        Self::load_from(&path).await
    }

    /// Load from a specific location
    pub async fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("no config at {:?}, using defaults", path);
            return Ok(Config::default());
        }

        debug!("loading config from {:?}", path);
        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save to the default location
    pub async fn save(&self) -> Result<()> {
        let path = config_path();
        self.save_to(&path).await
    }

    /// Save to a specific location
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        debug!("writing config to {:?}", path);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }

    /// First configured API key, OpenRouter preferred
    pub fn api_key(&self) -> Option<String> {
        let key = self.providers.openrouter.api_key.clone();
        if !key.is_empty() {
            return Some(key);
        }

        let key = self.providers.openai.api_key.clone();
        if !key.is_empty() {
            return Some(key);
        }

        None
    }

    /// API base matching the configured key
    pub fn api_base(&self) -> Option<String> {
        if !self.providers.openrouter.api_key.is_empty() {
            return self
                .providers
                .openrouter
                .api_base
                .clone()
                .or_else(|| Some("https://openrouter.ai/api/v1".to_string()));
        }

        self.providers.openai.api_base.clone()
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key().is_some()
    }

    pub fn default_model(&self) -> String {
        self.assistant.model.clone()
    }

    pub fn max_turns(&self) -> u32 {
        self.assistant.max_turns
    }

    pub fn session_max_messages(&self) -> usize {
        self.assistant.session_max_messages
    }

    pub fn history_messages(&self) -> usize {
        self.assistant.history_messages
    }
}

/// Create config and data directories, writing a default config if absent
pub async fn init() -> Result<Config> {
    let config_path = config_path();

    if config_path.exists() {
        warn!("config already exists at {:?}", config_path);
    } else {
        let config = Config::default();
        config.save().await?;
        info!("created config at {:?}", config_path);
    }

    tokio::fs::create_dir_all(campus_data_dir()).await?;
    tokio::fs::create_dir_all(sessions_dir()).await?;

    Config::load().await
}
