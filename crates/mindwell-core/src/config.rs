use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{MindError, Result};
use crate::types::UiVariant;

/// Top-level configuration for MindWell.
///
/// Loaded from `~/.mindwell/config.toml` by default. Every section is
/// optional; missing sections and fields take their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MindWellConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub chat: ChatProviderConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub voice: VoiceConfig,
}

impl MindWellConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: MindWellConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| MindError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// Server and logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Interface the HTTP server binds to.
    pub host: String,
    /// HTTP server port.
    pub port: u16,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,
            log_level: "info".to_string(),
        }
    }
}

/// Front-end settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Which page to serve: "text" or "voice".
    pub variant: UiVariant,
    /// Browser tab title.
    pub page_title: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            variant: UiVariant::Text,
            page_title: "Multilingual Mental Health Chatbot".to_string(),
        }
    }
}

/// Local chat model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatProviderConfig {
    /// Base URL of the Ollama server.
    pub base_url: String,
    /// Model name passed on every request.
    pub model: String,
    /// Upper bound on a single chat call, in seconds.
    pub request_timeout_secs: u64,
    /// Longest accepted user message, in characters.
    pub max_message_chars: usize,
}

impl Default for ChatProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "gemma:2b".to_string(),
            request_timeout_secs: 300,
            max_message_chars: 2000,
        }
    }
}

/// Session lifecycle settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Idle minutes after which a session is discarded.
    pub timeout_minutes: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout_minutes: 60,
        }
    }
}

/// Speech provider settings (voice variant only).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    /// Speech-to-text REST endpoint.
    pub recognition_endpoint: String,
    /// API key for the speech-to-text endpoint. Empty means unset.
    pub recognition_api_key: String,
    /// Base URL of the text-to-speech service.
    pub tts_base_url: String,
    /// Upper bound on a single speech call, in seconds.
    pub request_timeout_secs: u64,
    /// Largest accepted audio upload, in bytes.
    pub max_upload_bytes: usize,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            recognition_endpoint: "https://speech.googleapis.com/v1p1beta1/speech:recognize"
                .to_string(),
            recognition_api_key: String::new(),
            tts_base_url: "https://translate.google.com".to_string(),
            request_timeout_secs: 60,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}
