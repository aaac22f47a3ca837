//! Output formatting for strack.
//!
//! This module provides formatters for displaying tasks, sessions, and
//! reports in pretty or JSON form.

mod json;
mod pretty;

use crate::cli::args::OutputFormat;
use crate::error::StrackError;
use crate::features::study::{StudyReport, StudySession};
use crate::features::tasks::Task;

pub use json::*;
pub use pretty::*;

/// Format tasks based on output format
///
/// # Errors
///
/// Returns `StrackError::Parse` if JSON serialization fails.
pub fn format_tasks(
    tasks: &[Task],
    title: &str,
    format: OutputFormat,
) -> Result<String, StrackError> {
    match format {
        OutputFormat::Pretty => Ok(format_tasks_pretty(tasks, title)),
        OutputFormat::Json => format_tasks_json(tasks, title),
    }
}

/// Format sessions based on output format
///
/// # Errors
///
/// Returns `StrackError::Parse` if JSON serialization fails.
pub fn format_sessions(
    sessions: &[StudySession],
    format: OutputFormat,
) -> Result<String, StrackError> {
    match format {
        OutputFormat::Pretty => Ok(format_sessions_pretty(sessions)),
        OutputFormat::Json => format_sessions_json(sessions),
    }
}

/// Format a study report based on output format
///
/// # Errors
///
/// Returns `StrackError::Parse` if JSON serialization fails.
pub fn format_report(report: &StudyReport, format: OutputFormat) -> Result<String, StrackError> {
    match format {
        OutputFormat::Pretty => Ok(format_report_pretty(report)),
        OutputFormat::Json => to_json(report),
    }
}
