//! Configuration settings for strack.
//!
//! Settings are loaded from `~/.strack/config.yaml`.

use serde::{Deserialize, Serialize};

use crate::cli::args::OutputFormat;
use crate::config::Paths;
use crate::error::StrackError;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// General settings.
    pub general: GeneralConfig,
    /// Study session settings.
    pub study: StudyConfig,
    /// Backend sync settings.
    pub sync: SyncConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Default output format.
    #[serde(default = "default_output_format")]
    pub default_output: OutputFormat,
    /// Default category for tasks captured without a `#category` tag.
    #[serde(default = "default_category")]
    pub default_category: String,
}

/// Study session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StudyConfig {
    /// Default pomodoro duration in minutes.
    #[serde(default = "default_pomodoro_duration")]
    pub pomodoro_minutes: u32,
    /// Default focus block duration in minutes.
    #[serde(default = "default_focus_duration")]
    pub focus_minutes: u32,
    /// Daily study goal in minutes (used by reports).
    #[serde(default = "default_daily_goal")]
    pub daily_goal_minutes: u32,
}

/// Backend sync settings.
///
/// The `account` field is the signed-in identity; when it is absent, all
/// syncing is suppressed and captured work stays local.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Whether background sync is enabled at all.
    #[serde(default)]
    pub enabled: bool,
    /// Base URL of the hosted backend.
    #[serde(default = "default_backend_url")]
    pub backend_url: String,
    /// Signed-in account identifier, if any.
    #[serde(default)]
    pub account: Option<String>,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

// Default value functions for serde
const fn default_output_format() -> OutputFormat {
    OutputFormat::Pretty
}

fn default_category() -> String {
    "general".to_string()
}

const fn default_pomodoro_duration() -> u32 {
    25
}

const fn default_focus_duration() -> u32 {
    50
}

const fn default_daily_goal() -> u32 {
    120
}

fn default_backend_url() -> String {
    "https://api.strack.app".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_output: default_output_format(),
            default_category: default_category(),
        }
    }
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            pomodoro_minutes: default_pomodoro_duration(),
            focus_minutes: default_focus_duration(),
            daily_goal_minutes: default_daily_goal(),
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            backend_url: default_backend_url(),
            account: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self, StrackError> {
        let paths = Paths::new()?;
        Self::load_from_path(&paths.config_file)
    }

    /// Load configuration from a specific path.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load_from_path(path: &std::path::Path) -> Result<Self, StrackError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            StrackError::Config(format!("Failed to read config file {}: {e}", path.display()))
        })?;

        serde_yaml::from_str(&contents).map_err(|e| {
            StrackError::Config(format!("Failed to parse config file {}: {e}", path.display()))
        })
    }

    /// Save configuration to a specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be written.
    pub fn save_to_path(&self, path: &std::path::Path) -> Result<(), StrackError> {
        let contents = serde_yaml::to_string(self)
            .map_err(|e| StrackError::Config(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, contents).map_err(|e| {
            StrackError::Config(format!("Failed to write config file {}: {e}", path.display()))
        })
    }

    /// The identity the sync manager should attach with.
    ///
    /// `None` when sync is disabled or no account is signed in.
    #[must_use]
    pub fn sync_identity(&self) -> Option<String> {
        if !self.sync.enabled {
            return None;
        }
        self.sync.account.clone()
    }
}
