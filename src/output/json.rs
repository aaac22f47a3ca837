//! JSON output formatting for strack.

use serde::Serialize;
use serde_json::json;

use crate::error::StrackError;
use crate::features::study::StudySession;
use crate::features::tasks::Task;

/// Format tasks as JSON
///
/// # Errors
///
/// Returns `StrackError::Parse` if JSON serialization fails.
pub fn format_tasks_json(tasks: &[Task], list_name: &str) -> Result<String, StrackError> {
    let output = json!({
        "list": list_name,
        "count": tasks.len(),
        "items": tasks
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format sessions as JSON
///
/// # Errors
///
/// Returns `StrackError::Parse` if JSON serialization fails.
pub fn format_sessions_json(sessions: &[StudySession]) -> Result<String, StrackError> {
    let output = json!({
        "count": sessions.len(),
        "items": sessions
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Generic JSON formatter for any serializable type
///
/// # Errors
///
/// Returns `StrackError::Parse` if JSON serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, StrackError> {
    Ok(serde_json::to_string_pretty(value)?)
}
