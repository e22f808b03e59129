//! fintrack-config
//!
//! Process-wide application configuration and its on-disk persistence.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::{AppConfig, StorageKind, DEFAULT_LOG_FILTER, HOME_ENV};
