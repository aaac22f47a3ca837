//! Configuration management for strack.
//!
//! This module handles loading and saving configuration from `~/.strack/`.

mod paths;
mod settings;

pub use paths::Paths;
pub use settings::{Config, GeneralConfig, StudyConfig, SyncConfig};
