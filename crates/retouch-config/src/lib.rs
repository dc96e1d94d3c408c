//! # Retouch Config
//!
//! TOML configuration with `${VAR}` environment expansion.

mod error;
mod loader;
mod schema;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{Config, EditorConfig, LogConfig, MediatorConfig, StorageConfig};
