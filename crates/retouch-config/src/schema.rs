//! Configuration schema.

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub mediator: MediatorConfig,
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// Durable storage location.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage root directory; the platform data directory is used
    /// when unset.
    pub root: Option<String>,
}

/// Generative-AI mediator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediatorConfig {
    /// Credential; may also live in the store.
    pub api_key: Option<String>,
    /// Model for rewrite requests.
    #[serde(default = "default_model")]
    pub model: String,
    /// Override of the mediator endpoint (testing).
    pub base_url: Option<String>,
}

impl Default for MediatorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: None,
        }
    }
}

/// Editor forward endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorConfig {
    #[serde(default = "default_editor_endpoint")]
    pub endpoint: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            endpoint: default_editor_endpoint(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Directory for rolling file logs; stderr-only when unset.
    pub directory: Option<String>,
    /// Default filter when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            directory: None,
            level: default_log_level(),
        }
    }
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_editor_endpoint() -> String {
    "http://localhost:3001/update".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}
