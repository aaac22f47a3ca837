//! Study reports.
//!
//! Aggregates session history into per-period summaries.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::session::StudySession;
use super::storage::SessionStorage;
use crate::error::StrackError;

/// Report time period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportPeriod {
    /// Today only
    Today,
    /// Last 7 days
    Week,
    /// Last 30 days
    Month,
    /// All time
    AllTime,
}

impl ReportPeriod {
    /// Get the start and end timestamps for this period.
    #[must_use]
    pub fn date_range(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let today = Utc::now().date_naive();

        let start_date = match self {
            Self::Today => today,
            Self::Week => today - Duration::days(6),
            Self::Month => today - Duration::days(29),
            Self::AllTime => NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or(today),
        };

        let start_naive = start_date.and_hms_opt(0, 0, 0).unwrap_or_default();
        let start = DateTime::from_naive_utc_and_offset(start_naive, Utc);
        let end = Utc::now() + Duration::seconds(1);

        (start, end)
    }

    /// Parse period from string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "today" | "t" | "d" => Self::Today,
            "month" | "m" | "30d" => Self::Month,
            "all" | "alltime" | "all-time" => Self::AllTime,
            _ => Self::Week,
        }
    }

    /// Get display name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::Week => "This Week",
            Self::Month => "This Month",
            Self::AllTime => "All Time",
        }
    }
}

/// Aggregated study report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyReport {
    /// Report period name
    pub period: String,
    /// Total study time in minutes
    pub total_minutes: i64,
    /// Number of finished sessions
    pub sessions: i64,
    /// Average session length in minutes
    pub avg_session_minutes: f64,
    /// Longest session in minutes
    pub longest_session_minutes: i64,
    /// Minutes per session type
    pub minutes_by_type: BTreeMap<String, i64>,
    /// Configured daily goal in minutes
    pub daily_goal_minutes: i64,
}

impl StudyReport {
    /// Build a report for a period from stored sessions.
    ///
    /// # Errors
    ///
    /// Returns an error if session history cannot be read.
    pub fn build(
        storage: &SessionStorage<'_>,
        period: ReportPeriod,
        daily_goal_minutes: u32,
    ) -> Result<Self, StrackError> {
        let (start, end) = period.date_range();
        let sessions = storage.get_range(start, end)?;
        let mut report = Self::from_sessions(period, &sessions);
        report.daily_goal_minutes = i64::from(daily_goal_minutes);
        Ok(report)
    }

    /// Aggregate a report from a slice of finished sessions.
    #[must_use]
    pub fn from_sessions(period: ReportPeriod, sessions: &[StudySession]) -> Self {
        let total_seconds: i64 = sessions.iter().map(|s| s.duration_seconds).sum();
        let count = sessions.len() as i64;

        let longest_session_minutes = sessions
            .iter()
            .map(|s| s.duration_seconds / 60)
            .max()
            .unwrap_or(0);

        let mut minutes_by_type = BTreeMap::new();
        for session in sessions {
            *minutes_by_type
                .entry(session.session_type.as_str().to_string())
                .or_insert(0) += session.duration_seconds / 60;
        }

        #[allow(clippy::cast_precision_loss)]
        let avg_session_minutes = if count == 0 {
            0.0
        } else {
            (total_seconds as f64 / 60.0) / count as f64
        };

        Self {
            period: period.display_name().to_string(),
            total_minutes: total_seconds / 60,
            sessions: count,
            avg_session_minutes,
            longest_session_minutes,
            minutes_by_type,
            daily_goal_minutes: 0,
        }
    }

    /// Render the report as Markdown.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        let _ = writeln!(output, "# Study report — {}", self.period);
        let _ = writeln!(output);
        let _ = writeln!(output, "- Total time: {}m", self.total_minutes);
        let _ = writeln!(output, "- Sessions: {}", self.sessions);
        let _ = writeln!(output, "- Average session: {:.1}m", self.avg_session_minutes);
        let _ = writeln!(output, "- Longest session: {}m", self.longest_session_minutes);
        if self.daily_goal_minutes > 0 {
            let _ = writeln!(output, "- Daily goal: {}m", self.daily_goal_minutes);
        }

        if !self.minutes_by_type.is_empty() {
            let _ = writeln!(output);
            let _ = writeln!(output, "## By session type");
            let _ = writeln!(output);
            for (session_type, minutes) in &self.minutes_by_type {
                let _ = writeln!(output, "- {session_type}: {minutes}m");
            }
        }

        output
    }
}
