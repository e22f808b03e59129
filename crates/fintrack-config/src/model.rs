use std::{env, fmt, path::PathBuf};

use fintrack_domain::TimeFrame;
use serde::{Deserialize, Serialize};

/// Environment variable that overrides the default data directory.
pub const HOME_ENV: &str = "FINTRACK_HOME";
pub const DEFAULT_LOG_FILTER: &str = "fintrack=info";

/// Process-wide settings chosen at startup and passed into the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Root for data files and backups. Defaults to `$FINTRACK_HOME` or `~/.fintrack`.
    pub data_dir: Option<PathBuf>,
    pub backup_retention: usize,
    pub log_filter: String,
    pub default_time_frame: TimeFrame,
    pub recent_limit: usize,
    pub ui_color_enabled: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageKind::default(),
            data_dir: None,
            backup_retention: 5,
            log_filter: DEFAULT_LOG_FILTER.into(),
            default_time_frame: TimeFrame::Monthly,
            recent_limit: 5,
            ui_color_enabled: true,
        }
    }
}

impl AppConfig {
    /// In-memory configuration for tests and throwaway sessions.
    pub fn ephemeral() -> Self {
        Self {
            storage: StorageKind::Memory,
            ..Self::default()
        }
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Explicit `data_dir`, then `$FINTRACK_HOME`, then `~/.fintrack`.
    pub fn resolve_data_dir(&self) -> PathBuf {
        if let Some(path) = &self.data_dir {
            return path.clone();
        }
        if let Some(home) = env::var_os(HOME_ENV).filter(|value| !value.is_empty()) {
            return PathBuf::from(home);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".fintrack")
    }
}

/// Backend selected for the key-value persistence port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    Memory,
    #[default]
    Json,
}

impl StorageKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" | "mem" => Some(StorageKind::Memory),
            "json" | "file" => Some(StorageKind::Json),
            _ => None,
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StorageKind::Memory => "memory",
            StorageKind::Json => "json",
        };
        f.write_str(label)
    }
}
