//! TUI configuration persistence
//!
//! Saves and loads presentation preferences and the simulated device's
//! enrollment. The allowed-factor toggles are never stored; they reset to
//! "everything allowed" on every start.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use unlatch_core::{Enrollment, EvaluationRequest, DEFAULT_CANCEL_LABEL, DEFAULT_REASON};

/// Configuration file name
const CONFIG_FILE_NAME: &str = "config.json";

/// Configuration directory under ~/.config
const CONFIG_DIR_NAME: &str = "unlatch";

/// Color scheme
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ThemeChoice {
    #[default]
    Dark,
    HighContrast,
}

/// TUI configuration that persists across sessions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TuiConfig {
    /// Justification shown in the authentication prompt
    #[serde(default = "default_reason")]
    pub reason: String,

    /// Label of the prompt's cancel affordance
    #[serde(default = "default_cancel_label")]
    pub cancel_label: String,

    /// Color scheme
    #[serde(default)]
    pub theme: ThemeChoice,

    /// Redraw interval in milliseconds
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,

    /// Factors the simulated device offers
    #[serde(default)]
    pub enrollment: Enrollment,
}

fn default_reason() -> String {
    DEFAULT_REASON.to_string()
}

fn default_cancel_label() -> String {
    DEFAULT_CANCEL_LABEL.to_string()
}

fn default_tick_rate_ms() -> u64 {
    100
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            reason: default_reason(),
            cancel_label: default_cancel_label(),
            theme: ThemeChoice::default(),
            tick_rate_ms: default_tick_rate_ms(),
            enrollment: Enrollment::default(),
        }
    }
}

impl TuiConfig {
    /// Get the configuration directory path
    pub fn config_dir() -> Option<PathBuf> {
        // Try XDG_CONFIG_HOME first, then fall back to ~/.config
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            return Some(PathBuf::from(xdg_config).join(CONFIG_DIR_NAME));
        }

        dirs::config_dir().map(|p| p.join(CONFIG_DIR_NAME))
    }

    /// Get the full config file path
    pub fn config_file_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default location
    ///
    /// Writes the defaults on first run. Returns default configuration if
    /// the file can't be parsed.
    pub fn load() -> Self {
        match Self::config_file_path() {
            Some(path) => Self::load_or_create_at(&path),
            None => Self::default(),
        }
    }

    /// Load configuration from `path`, creating it with defaults if missing
    pub fn load_or_create_at(path: &Path) -> Self {
        if path.exists() {
            return Self::load_from(path);
        }

        let config = Self::default();
        match config.save_to(path) {
            Ok(()) => tracing::info!("Created default config at {:?}", path),
            Err(e) => tracing::warn!("Failed to create config file: {}", e),
        }
        config
    }

    /// Load configuration from `path`, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse config file: {}", e);
                Self::default()
            }),
            Err(e) => {
                tracing::warn!("Failed to read config file: {}", e);
                Self::default()
            }
        }
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(dir) = path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir).map_err(|e| ConfigError::Io(e.to_string()))?;
            }
        }

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;

        fs::write(path, contents).map_err(|e| ConfigError::Io(e.to_string()))?;

        tracing::debug!("Saved config to {:?}", path);
        Ok(())
    }

    /// Prompt text for the platform
    pub fn evaluation_request(&self) -> EvaluationRequest {
        EvaluationRequest::new(self.reason.clone(), self.cancel_label.clone())
    }

    /// Redraw interval, never shorter than 10ms
    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms.max(10))
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialize(String),
}
