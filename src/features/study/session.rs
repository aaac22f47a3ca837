//! Study session management.
//!
//! Handles starting, finishing, and directly logging study sessions.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Type of study session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionType {
    /// Standard Pomodoro block (25 minutes)
    Pomodoro,
    /// Longer deep-focus block (50 minutes)
    Focus,
    /// Revision/review pass (15 minutes)
    Review,
    /// Open-ended session (no planned length)
    OpenEnded,
}

impl SessionType {
    /// Get the default duration for this session type.
    #[must_use]
    pub const fn default_duration(&self) -> Duration {
        match self {
            Self::Pomodoro => Duration::minutes(25),
            Self::Focus => Duration::minutes(50),
            Self::Review => Duration::minutes(15),
            Self::OpenEnded => Duration::zero(),
        }
    }

    /// Parse session type from string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "pomodoro" | "pomo" | "p" => Self::Pomodoro,
            "focus" | "f" => Self::Focus,
            "review" | "revision" | "r" => Self::Review,
            _ => Self::OpenEnded,
        }
    }

    /// The identifier stored locally and sent to the backend.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pomodoro => "pomodoro",
            Self::Focus => "focus",
            Self::Review => "review",
            Self::OpenEnded => "open_ended",
        }
    }

    /// Get display name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Pomodoro => "Pomodoro",
            Self::Focus => "Focus",
            Self::Review => "Review",
            Self::OpenEnded => "Open-Ended",
        }
    }
}

impl std::fmt::Display for SessionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A study session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudySession {
    /// Database ID (None if not persisted)
    pub id: Option<i64>,
    /// Session type
    pub session_type: SessionType,
    /// When the session started
    pub started_at: DateTime<Utc>,
    /// When the session ended (None if still running)
    pub ended_at: Option<DateTime<Utc>>,
    /// Time studied in seconds
    pub duration_seconds: i64,
    /// What was being studied (free-form)
    pub task: Option<String>,
    /// Optional notes
    pub notes: Option<String>,
}

impl StudySession {
    /// Start a new running session.
    #[must_use]
    pub fn start(session_type: SessionType, task: Option<String>) -> Self {
        Self {
            id: None,
            session_type,
            started_at: Utc::now(),
            ended_at: None,
            duration_seconds: 0,
            task,
            notes: None,
        }
    }

    /// Record an already-finished session of a given length.
    #[must_use]
    pub fn logged(session_type: SessionType, duration_seconds: i64, task: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            session_type,
            started_at: now - Duration::seconds(duration_seconds),
            ended_at: Some(now),
            duration_seconds,
            task,
            notes: None,
        }
    }

    /// Finish a running session, computing its duration.
    pub fn finish(&mut self) {
        let now = Utc::now();
        self.duration_seconds = now
            .signed_duration_since(self.started_at)
            .num_seconds()
            .max(0);
        self.ended_at = Some(now);
    }

    /// Check if the session is still running.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.ended_at.is_none()
    }

    /// Elapsed time since the session started.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.ended_at
            .unwrap_or_else(Utc::now)
            .signed_duration_since(self.started_at)
    }

    /// Format the session status for display.
    #[must_use]
    pub fn format_status(&self) -> String {
        let elapsed = format_duration_short(self.elapsed());
        let task_info = self
            .task
            .as_ref()
            .map_or_else(String::new, |t| format!(" on \"{t}\""));

        if self.is_active() {
            format!("{} session{task_info} - {elapsed} elapsed", self.session_type)
        } else {
            format!("{} session{task_info} - {elapsed}", self.session_type)
        }
    }
}

/// Format a duration as a short string (e.g., "25m", "1h 30m").
#[must_use]
pub fn format_duration_short(d: Duration) -> String {
    let total_minutes = d.num_minutes();
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}
