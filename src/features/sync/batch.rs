//! The pending mutation batch.
//!
//! While the app is offline (or signed out with sync enabled), task captures
//! and session recordings append here instead of going to the backend. The
//! batch is serialized as a single JSON object and persisted in one slot of
//! the local database; the sync manager drains it category by category.

use serde::{Deserialize, Serialize};

/// A task captured while offline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTask {
    /// Task title.
    pub title: String,
    /// Task category (subject).
    pub category: String,
}

/// A study session recorded while offline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingSession {
    /// Session length in seconds.
    pub duration_seconds: i64,
    /// Session type (pomodoro, focus, ...).
    pub session_type: String,
}

/// The offline buffer, keyed by category.
///
/// Field names match the store format used by earlier releases: a category
/// that has nothing pending is omitted from the serialized object entirely.
/// Entries keep insertion order and are never reordered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingBatch {
    /// Pending task creations.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub todos: Vec<PendingTask>,
    /// Pending session recordings.
    #[serde(
        default,
        rename = "studySessions",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub study_sessions: Vec<PendingSession>,
}

impl PendingBatch {
    /// Check whether anything is pending in any category.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.todos.is_empty() && self.study_sessions.is_empty()
    }

    /// Total number of pending entries across categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.todos.len() + self.study_sessions.len()
    }

    /// Append a task capture.
    pub fn push_task(&mut self, title: impl Into<String>, category: impl Into<String>) {
        self.todos.push(PendingTask {
            title: title.into(),
            category: category.into(),
        });
    }

    /// Append a session recording.
    pub fn push_session(&mut self, duration_seconds: i64, session_type: impl Into<String>) {
        self.study_sessions.push(PendingSession {
            duration_seconds,
            session_type: session_type.into(),
        });
    }
}
