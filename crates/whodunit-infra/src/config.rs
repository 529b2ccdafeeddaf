//! Configuration loading for Whodunit.
//!
//! Reads `config.toml` from the working directory and deserializes it into
//! [`AppConfig`]. A missing file falls back to defaults; a file that exists
//! but does not parse is fatal (a typo'd provider must not silently select
//! the default one). API keys come from the environment only and the prompt
//! templates are loaded once at startup -- both are fatal when absent.

use std::path::{Path, PathBuf};

use secrecy::SecretString;
use serde::Deserialize;

use whodunit_core::prompt::PromptTemplate;
use whodunit_types::llm::ProviderKind;

/// Environment variable overriding the listening port.
const PORT_ENV: &str = "PORT";

/// Process-wide configuration, fixed at startup. No live reload.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Which provider backend handles completions.
    pub provider: ProviderKind,
    /// Model identifier passed to the provider.
    pub model: String,
    /// Listening port; the `PORT` env var takes priority.
    pub port: u16,
    /// Listening host.
    pub host: String,
    /// Whether chat turns are requested in structured (JSON) mode.
    pub structured_chat: bool,
    /// Path to the interrogation prompt template.
    pub chat_template: PathBuf,
    /// Path to the final-deduction prompt template.
    pub deduction_template: PathBuf,
    pub openai: OpenAiSettings,
    pub gemini: GeminiSettings,
    pub weather: WeatherSettings,
}

/// OpenAI-shaped provider settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OpenAiSettings {
    /// Full chat-completions endpoint URL (a proxy may stand in for the
    /// real API).
    pub endpoint: String,
}

/// Gemini-shaped provider settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeminiSettings {
    /// Base URL; the model name and action are appended per request.
    pub base_url: String,
}

/// Ambient weather enrichment settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WeatherSettings {
    pub enabled: bool,
    pub latitude: f64,
    pub longitude: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::OpenAi,
            model: "gpt-4o-mini".to_string(),
            port: 8080,
            host: "127.0.0.1".to_string(),
            structured_chat: true,
            chat_template: PathBuf::from("prompts/chat.md"),
            deduction_template: PathBuf::from("prompts/final-deduction.md"),
            openai: OpenAiSettings::default(),
            gemini: GeminiSettings::default(),
            weather: WeatherSettings::default(),
        }
    }
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
        }
    }
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta/models/".to_string(),
        }
    }
}

impl Default for WeatherSettings {
    fn default() -> Self {
        // Tokyo
        Self {
            enabled: true,
            latitude: 35.6895,
            longitude: 139.6917,
        }
    }
}

impl AppConfig {
    /// The effective listening port: `PORT` env var, then config, then 8080.
    pub fn listen_port(&self) -> u16 {
        std::env::var(PORT_ENV)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(self.port)
    }

    /// Name of the environment variable holding the selected provider's key.
    pub fn api_key_env(&self) -> &'static str {
        match self.provider {
            ProviderKind::OpenAi => "OPENAI_API_KEY",
            ProviderKind::Gemini => "GEMINI_API_KEY",
        }
    }

    /// Resolve the selected provider's API key from the environment.
    ///
    /// Fails fast at startup, before any network call is possible.
    pub fn api_key(&self) -> Result<SecretString, ConfigError> {
        match std::env::var(self.api_key_env()) {
            Ok(value) if !value.is_empty() => Ok(SecretString::from(value)),
            _ => Err(ConfigError::MissingApiKey(self.api_key_env())),
        }
    }
}

/// Errors raised while assembling startup configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("environment variable {0} is not set")]
    MissingApiKey(&'static str),

    #[error("failed to read prompt template {path}: {source}")]
    Template {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Load configuration from `config_path`.
///
/// A missing file is fine (defaults apply); an unreadable or unparseable
/// file is fatal.
pub async fn load_config(config_path: &Path) -> Result<AppConfig, ConfigError> {
    let content = match tokio::fs::read_to_string(config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("no config file at {}, using defaults", config_path.display());
            return Ok(AppConfig::default());
        }
        Err(err) => {
            return Err(ConfigError::Read {
                path: config_path.to_path_buf(),
                source: err,
            });
        }
    };

    toml::from_str(&content).map_err(|err| ConfigError::Parse {
        path: config_path.to_path_buf(),
        source: err,
    })
}

/// The two prompt templates, loaded once at startup.
#[derive(Debug, Clone)]
pub struct GameTemplates {
    pub chat: PromptTemplate,
    pub deduction: PromptTemplate,
}

/// Load both templates from disk. Fatal to startup when either is missing.
pub async fn load_templates(config: &AppConfig) -> Result<GameTemplates, ConfigError> {
    let chat = read_template(&config.chat_template).await?;
    let deduction = read_template(&config.deduction_template).await?;
    Ok(GameTemplates { chat, deduction })
}

async fn read_template(path: &Path) -> Result<PromptTemplate, ConfigError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|err| ConfigError::Template {
            path: path.to_path_buf(),
            source: err,
        })?;
    Ok(PromptTemplate::new(text))
}
