//! Path resolution for strack configuration and data files.
//!
//! All strack data is stored in `~/.strack/`:
//! - `config.yaml` - Main configuration file
//! - `strack.db` - SQLite database for tasks, sessions, and the sync buffer
//! - `exports/` - Generated report exports
//! - `cache/` - Cached data (completions, etc.)

use std::path::PathBuf;

use crate::error::StrackError;

/// Paths to strack configuration and data directories.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Root directory: `~/.strack/`
    pub root: PathBuf,
    /// Config file: `~/.strack/config.yaml`
    pub config_file: PathBuf,
    /// Database file: `~/.strack/strack.db`
    pub database: PathBuf,
    /// Exports directory: `~/.strack/exports/`
    pub exports: PathBuf,
    /// Cache directory: `~/.strack/cache/`
    pub cache: PathBuf,
}

impl Paths {
    /// Create paths based on the user's home directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, StrackError> {
        let home = std::env::var("HOME")
            .map_err(|_| StrackError::Config("Could not determine home directory".to_string()))?;

        Ok(Self::with_root(PathBuf::from(home).join(".strack")))
    }

    /// Create paths with a custom root directory (useful for testing).
    #[must_use]
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            config_file: root.join("config.yaml"),
            database: root.join("strack.db"),
            exports: root.join("exports"),
            cache: root.join("cache"),
            root,
        }
    }

    /// Ensure all directories exist, creating them if necessary.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub fn ensure_dirs(&self) -> Result<(), StrackError> {
        for dir in [&self.root, &self.exports, &self.cache] {
            if !dir.exists() {
                std::fs::create_dir_all(dir).map_err(|e| {
                    StrackError::Config(format!("Failed to create directory {}: {e}", dir.display()))
                })?;
            }
        }

        Ok(())
    }
}

impl Default for Paths {
    fn default() -> Self {
        Self::new().unwrap_or_else(|_| {
            // Fallback to current directory if home cannot be determined
            Self::with_root(PathBuf::from(".strack"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_paths_with_root() {
        let root = PathBuf::from("/tmp/test-strack");
        let paths = Paths::with_root(root.clone());

        assert_eq!(paths.root, root);
        assert_eq!(paths.config_file, root.join("config.yaml"));
        assert_eq!(paths.database, root.join("strack.db"));
        assert_eq!(paths.exports, root.join("exports"));
        assert_eq!(paths.cache, root.join("cache"));
    }

    #[test]
    fn test_ensure_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let paths = Paths::with_root(temp_dir.path().join("nested"));

        paths.ensure_dirs().unwrap();

        assert!(paths.root.exists());
        assert!(paths.exports.exists());
        assert!(paths.cache.exists());
    }
}
