//! The task model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A captured study task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Database ID (None if not persisted)
    pub id: Option<i64>,
    /// What to do
    pub title: String,
    /// Subject/category the task belongs to
    pub category: String,
    /// Whether the task has been completed
    pub done: bool,
    /// When the task was captured
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Create a new open task.
    #[must_use]
    pub fn new(title: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            category: category.into(),
            done: false,
            created_at: Utc::now(),
        }
    }
}
