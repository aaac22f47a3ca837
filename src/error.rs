//! Error types for strack.

use thiserror::Error;

/// Errors that can occur across strack operations.
#[derive(Debug, Error)]
pub enum StrackError {
    /// Local database failure.
    #[error("Database error: {0}")]
    Database(String),

    /// Configuration loading/saving failure.
    #[error("Config error: {0}")]
    Config(String),

    /// A requested item does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The hosted backend rejected or failed a request.
    #[error("Backend error: {0}")]
    Backend(String),

    /// JSON (de)serialization failure.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Filesystem failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
