use colored::Colorize;

use crate::features::study::{StudyReport, StudySession};
use crate::features::tasks::Task;

/// Format a list of tasks as a pretty table
pub fn format_tasks_pretty(tasks: &[Task], title: &str) -> String {
    if tasks.is_empty() {
        return format!("{} (0 items)\n  No items", title);
    }

    let mut output = format!("{} ({} items)\n", title, tasks.len());
    output.push_str(&"─".repeat(60));
    output.push('\n');

    for task in tasks {
        let status_icon = if task.done {
            "[x]".green()
        } else {
            "[ ]".white()
        };

        let id = task.id.map(|i| i.to_string()).unwrap_or_default();

        let mut line = format!("{} {:<4} {}", status_icon, id.dimmed(), task.title.bold());
        line.push_str(&format!("  #{}", task.category).cyan().to_string());

        output.push_str(&line);
        output.push('\n');
    }

    output
}

/// Format a list of sessions as pretty output
pub fn format_sessions_pretty(sessions: &[StudySession]) -> String {
    if sessions.is_empty() {
        return "No sessions recorded yet.".to_string();
    }

    let mut output = format!("Sessions ({})\n", sessions.len());
    output.push_str(&"─".repeat(60));
    output.push('\n');

    for session in sessions {
        let minutes = session.duration_seconds / 60;
        let when = session.started_at.format("%Y-%m-%d %H:%M");
        let task_info = session
            .task
            .as_ref()
            .map_or_else(String::new, |t| format!("  {}", t.dimmed()));

        let line = if session.is_active() {
            format!(
                "{} {} {}{}",
                "▶".yellow(),
                when,
                session.session_type.to_string().bold(),
                task_info
            )
        } else {
            format!(
                "{} {} {} ({}m){}",
                "•".white(),
                when,
                session.session_type.to_string().bold(),
                minutes,
                task_info
            )
        };

        output.push_str(&line);
        output.push('\n');
    }

    output
}

/// Format a study report as pretty output
pub fn format_report_pretty(report: &StudyReport) -> String {
    let mut lines = Vec::new();

    lines.push(format!("Study Report — {}", report.period).bold().to_string());
    lines.push("─".repeat(40));

    lines.push(format!(
        "  Total time:      {}",
        format!("{}m", report.total_minutes).green()
    ));
    lines.push(format!("  Sessions:        {}", report.sessions));
    lines.push(format!(
        "  Average session: {:.1}m",
        report.avg_session_minutes
    ));
    lines.push(format!(
        "  Longest session: {}m",
        report.longest_session_minutes
    ));

    if report.daily_goal_minutes > 0 {
        lines.push(format!("  Daily goal:      {}m", report.daily_goal_minutes));
    }

    if !report.minutes_by_type.is_empty() {
        lines.push(String::new());
        lines.push("By type:".to_string());
        for (session_type, minutes) in &report.minutes_by_type {
            lines.push(format!("  {:<12} {}m", session_type, minutes));
        }
    }

    lines.join("\n")
}
