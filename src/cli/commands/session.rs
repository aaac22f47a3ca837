//! Session commands: start, stop, status, log, list.

use colored::Colorize;

use super::common::{deliver, open_database, Mutation};
use crate::cli::args::{OutputFormat, SessionCommands};
use crate::config::Config;
use crate::error::StrackError;
use crate::features::study::{SessionStorage, SessionType, StudySession};
use crate::features::sync::PendingSession;
use crate::output::{format_sessions, to_json};

/// Execute session subcommands.
pub fn session(cmd: SessionCommands, format: OutputFormat) -> Result<String, StrackError> {
    match cmd {
        SessionCommands::Start { session_type, task } => start(&session_type, task, format),
        SessionCommands::Stop => stop(format),
        SessionCommands::Status => status(format),
        SessionCommands::Log {
            minutes,
            session_type,
            task,
        } => log(minutes, &session_type, task, format),
        SessionCommands::List { limit } => list(limit, format),
    }
}

fn start(
    session_type: &str,
    task: Option<String>,
    format: OutputFormat,
) -> Result<String, StrackError> {
    let config = Config::load()?;
    let db = open_database()?;
    let storage = SessionStorage::new(&db);

    if let Some(active) = storage.get_active()? {
        return Err(StrackError::Config(format!(
            "A session is already running: {}",
            active.format_status()
        )));
    }

    let mut session = StudySession::start(SessionType::parse(session_type), task);
    storage.save(&mut session)?;

    let planned = planned_minutes(&config, session.session_type)
        .map_or_else(String::new, |m| format!(" ({m}m planned)"));

    match format {
        OutputFormat::Json => to_json(&session),
        OutputFormat::Pretty => Ok(format!(
            "{} Started {} session{}{}",
            "▶".yellow(),
            session.session_type.to_string().bold(),
            session
                .task
                .as_ref()
                .map_or_else(String::new, |t| format!(" on \"{t}\"")),
            planned.dimmed()
        )),
    }
}

/// Configured length for a session type, if it has one.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn planned_minutes(config: &Config, session_type: SessionType) -> Option<u32> {
    match session_type {
        SessionType::Pomodoro => Some(config.study.pomodoro_minutes),
        SessionType::Focus => Some(config.study.focus_minutes),
        SessionType::Review => Some(SessionType::Review.default_duration().num_minutes() as u32),
        SessionType::OpenEnded => None,
    }
}

fn stop(format: OutputFormat) -> Result<String, StrackError> {
    let config = Config::load()?;
    let db = open_database()?;
    let storage = SessionStorage::new(&db);

    let Some(mut session) = storage.get_active()? else {
        return Err(StrackError::NotFound("No running session".to_string()));
    };

    session.finish();
    storage.save(&mut session)?;

    let delivery = deliver(
        &config,
        &db,
        Mutation::Session(PendingSession {
            duration_seconds: session.duration_seconds,
            session_type: session.session_type.as_str().to_string(),
        }),
    )?;

    match format {
        OutputFormat::Json => to_json(&session),
        OutputFormat::Pretty => {
            let minutes = session.duration_seconds / 60;
            Ok(format!(
                "{} Finished {} session: {}m{}",
                "✓".green(),
                session.session_type.to_string().bold(),
                minutes,
                delivery.describe().dimmed()
            ))
        }
    }
}

fn status(format: OutputFormat) -> Result<String, StrackError> {
    let db = open_database()?;
    let active = SessionStorage::new(&db).get_active()?;

    match format {
        OutputFormat::Json => to_json(&active),
        OutputFormat::Pretty => Ok(active.map_or_else(
            || "No running session.".to_string(),
            |session| session.format_status(),
        )),
    }
}

fn log(
    minutes: i64,
    session_type: &str,
    task: Option<String>,
    format: OutputFormat,
) -> Result<String, StrackError> {
    if minutes <= 0 {
        return Err(StrackError::Config(
            "Session length must be positive".to_string(),
        ));
    }

    let config = Config::load()?;
    let db = open_database()?;

    let mut session = StudySession::logged(SessionType::parse(session_type), minutes * 60, task);
    SessionStorage::new(&db).save(&mut session)?;

    let delivery = deliver(
        &config,
        &db,
        Mutation::Session(PendingSession {
            duration_seconds: session.duration_seconds,
            session_type: session.session_type.as_str().to_string(),
        }),
    )?;

    match format {
        OutputFormat::Json => to_json(&session),
        OutputFormat::Pretty => Ok(format!(
            "{} Logged {}m {} session{}",
            "✓".green(),
            minutes,
            session.session_type.to_string().bold(),
            delivery.describe().dimmed()
        )),
    }
}

fn list(limit: usize, format: OutputFormat) -> Result<String, StrackError> {
    let db = open_database()?;
    let sessions = SessionStorage::new(&db).get_recent(limit)?;
    format_sessions(&sessions, format)
}
