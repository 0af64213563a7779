//! Game configuration.

use crate::llm_client::{LlmConfig, LlmProvider};
use crate::session::Timing;
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Configuration for clue generation and play timing.
///
/// Every field has a default, so an empty TOML file is valid.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct GameConfig {
    /// LLM provider (openai, anthropic or gemini).
    #[serde(default = "default_provider")]
    llm_provider: LlmProvider,

    /// LLM model name (e.g., "gemini-2.5-flash", "gpt-4o-mini").
    #[serde(default = "default_model")]
    llm_model: String,

    /// Maximum tokens for LLM responses.
    #[serde(default = "default_max_tokens")]
    llm_max_tokens: u32,

    /// Language the clues are written in.
    #[serde(default = "default_language")]
    language: String,

    /// Delay before a matched group locks in, in milliseconds.
    #[serde(default = "default_confirm_delay_ms")]
    confirm_delay_ms: u64,

    /// Delay before a mistake is shown and again before it clears, in milliseconds.
    #[serde(default = "default_mistake_delay_ms")]
    mistake_delay_ms: u64,
}

fn default_provider() -> LlmProvider {
    LlmProvider::Gemini
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_language() -> String {
    "Dutch".to_string()
}

fn default_confirm_delay_ms() -> u64 {
    200
}

fn default_mistake_delay_ms() -> u64 {
    500
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            llm_provider: default_provider(),
            llm_model: default_model(),
            llm_max_tokens: default_max_tokens(),
            language: default_language(),
            confirm_delay_ms: default_confirm_delay_ms(),
            mistake_delay_ms: default_mistake_delay_ms(),
        }
    }
}

impl GameConfig {
    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_toml(&content)?;
        info!(provider = %config.llm_provider, model = %config.llm_model, "Config loaded successfully");
        Ok(config)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))
    }

    /// Loads the file if given, otherwise uses defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Overrides the provider and model.
    pub fn with_llm(mut self, provider: LlmProvider, model: impl Into<String>) -> Self {
        self.llm_provider = provider;
        self.llm_model = model.into();
        self
    }

    /// Presentation delays for play sessions.
    pub fn timing(&self) -> Timing {
        Timing::from_millis(self.confirm_delay_ms, self.mistake_delay_ms)
    }

    /// Creates LLM configuration from this config.
    ///
    /// Reads the provider's key from `OPENAI_API_KEY`, `ANTHROPIC_API_KEY`
    /// or `GEMINI_API_KEY`.
    #[instrument(skip(self), fields(provider = ?self.llm_provider, model = %self.llm_model))]
    pub fn create_llm_config(&self) -> Result<LlmConfig, ConfigError> {
        debug!("Creating LLM config");
        let var = self.llm_provider.api_key_var();
        let api_key = std::env::var(var)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigError::new(format!("{} environment variable not set", var)))?;

        Ok(LlmConfig::new(
            self.llm_provider,
            api_key,
            self.llm_model.clone(),
            self.llm_max_tokens,
        ))
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
