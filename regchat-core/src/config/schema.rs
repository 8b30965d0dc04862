//! Configuration schema definitions

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::lang::Language;

/// Root configuration for regchat
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Inference API configuration
    #[serde(default)]
    pub api: ApiConfig,
    /// Local persistence configuration
    #[serde(default)]
    pub storage: StorageConfig,
    /// Chat behavior configuration
    #[serde(default)]
    pub chat: ChatConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Directory holding the persisted chat state
    pub fn data_dir(&self) -> PathBuf {
        match &self.storage.dir {
            Some(dir) => dir.clone(),
            None => dirs::home_dir()
                .map(|h| h.join(".regchat").join("data"))
                .unwrap_or_else(|| PathBuf::from(".regchat/data")),
        }
    }
}

/// Inference API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Endpoint receiving the POST query
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    "https://ahmed-ayman-fcai-usc-regulations-chatbot-api.hf.space/api/chat".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Local persistence configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// Data directory; defaults to `~/.regchat/data` when unset
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

/// Chat behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Language used until a persisted preference exists
    #[serde(default)]
    pub language: Language,
    /// Milliseconds the store stays in the error status before recovering
    #[serde(default = "default_error_cooldown_ms")]
    pub error_cooldown_ms: u64,
}

fn default_error_cooldown_ms() -> u64 {
    2000
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            language: Language::default(),
            error_cooldown_ms: default_error_cooldown_ms(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (text, json)
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Directory for log files
    #[serde(default = "default_log_dir")]
    pub dir: String,
    /// Module-specific overrides
    #[serde(default)]
    pub overrides: HashMap<String, String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            dir: default_log_dir(),
            overrides: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.api.endpoint.starts_with("https://"));
        assert_eq!(config.chat.error_cooldown_ms, 2000);
        assert_eq!(config.chat.language, Language::Ar);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"api": {"endpoint": "http://localhost:8000/api/chat"}}"#)
                .unwrap();
        assert_eq!(config.api.endpoint, "http://localhost:8000/api/chat");
        assert_eq!(config.api.timeout_secs, 60);
        assert_eq!(config.chat.error_cooldown_ms, 2000);
    }
}
