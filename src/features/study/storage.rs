//! Study session storage.
//!
//! Persists study sessions to the local database.

use chrono::{DateTime, Utc};
use rusqlite::{params, Row};

use super::session::{SessionType, StudySession};
use crate::error::StrackError;
use crate::storage::Database;

/// Storage for study sessions.
pub struct SessionStorage<'a> {
    db: &'a Database,
}

impl<'a> SessionStorage<'a> {
    /// Create storage over an open database.
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Save a session.
    ///
    /// If the session has an ID, it will be updated. Otherwise, it will be
    /// inserted.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be saved.
    pub fn save(&self, session: &mut StudySession) -> Result<(), StrackError> {
        if session.id.is_some() {
            self.update(session)
        } else {
            self.insert(session)
        }
    }

    fn insert(&self, session: &mut StudySession) -> Result<(), StrackError> {
        let conn = self.db.connection();

        conn.execute(
            r"INSERT INTO study_sessions
              (session_type, started_at, ended_at, duration_seconds, task, notes)
              VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                session.session_type.as_str(),
                session.started_at.to_rfc3339(),
                session.ended_at.map(|t| t.to_rfc3339()),
                session.duration_seconds,
                session.task,
                session.notes,
            ],
        )
        .map_err(|e| StrackError::Database(format!("Failed to insert session: {e}")))?;

        session.id = Some(conn.last_insert_rowid());
        Ok(())
    }

    fn update(&self, session: &StudySession) -> Result<(), StrackError> {
        let conn = self.db.connection();

        conn.execute(
            r"UPDATE study_sessions SET
              session_type = ?1,
              started_at = ?2,
              ended_at = ?3,
              duration_seconds = ?4,
              task = ?5,
              notes = ?6
              WHERE id = ?7",
            params![
                session.session_type.as_str(),
                session.started_at.to_rfc3339(),
                session.ended_at.map(|t| t.to_rfc3339()),
                session.duration_seconds,
                session.task,
                session.notes,
                session.id,
            ],
        )
        .map_err(|e| StrackError::Database(format!("Failed to update session: {e}")))?;

        Ok(())
    }

    /// Get the currently running session (if any).
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_active(&self) -> Result<Option<StudySession>, StrackError> {
        let conn = self.db.connection();

        let mut stmt = conn
            .prepare(
                r"SELECT id, session_type, started_at, ended_at, duration_seconds, task, notes
                  FROM study_sessions
                  WHERE ended_at IS NULL
                  ORDER BY started_at DESC
                  LIMIT 1",
            )
            .map_err(|e| StrackError::Database(format!("Failed to prepare query: {e}")))?;

        let result = stmt
            .query_row([], row_to_session)
            .optional()
            .map_err(|e| StrackError::Database(format!("Failed to query active session: {e}")))?;

        Ok(result)
    }

    /// Get recent sessions, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_recent(&self, limit: usize) -> Result<Vec<StudySession>, StrackError> {
        let conn = self.db.connection();

        let mut stmt = conn
            .prepare(
                r"SELECT id, session_type, started_at, ended_at, duration_seconds, task, notes
                  FROM study_sessions
                  ORDER BY started_at DESC
                  LIMIT ?1",
            )
            .map_err(|e| StrackError::Database(format!("Failed to prepare query: {e}")))?;

        let rows = stmt
            .query_map([limit], row_to_session)
            .map_err(|e| StrackError::Database(format!("Failed to query sessions: {e}")))?;

        let mut sessions = Vec::new();
        for row in rows {
            sessions.push(row.map_err(|e| StrackError::Database(e.to_string()))?);
        }

        Ok(sessions)
    }

    /// Get finished sessions within a date range.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<StudySession>, StrackError> {
        let conn = self.db.connection();

        let mut stmt = conn
            .prepare(
                r"SELECT id, session_type, started_at, ended_at, duration_seconds, task, notes
                  FROM study_sessions
                  WHERE started_at >= ?1 AND started_at < ?2 AND ended_at IS NOT NULL
                  ORDER BY started_at DESC",
            )
            .map_err(|e| StrackError::Database(format!("Failed to prepare query: {e}")))?;

        let rows = stmt
            .query_map([start.to_rfc3339(), end.to_rfc3339()], row_to_session)
            .map_err(|e| StrackError::Database(format!("Failed to query sessions: {e}")))?;

        let mut sessions = Vec::new();
        for row in rows {
            sessions.push(row.map_err(|e| StrackError::Database(e.to_string()))?);
        }

        Ok(sessions)
    }
}

/// Convert a database row to a StudySession.
fn row_to_session(row: &Row<'_>) -> Result<StudySession, rusqlite::Error> {
    let id: i64 = row.get(0)?;
    let session_type_str: String = row.get(1)?;
    let started_at_str: String = row.get(2)?;
    let ended_at_str: Option<String> = row.get(3)?;
    let duration_seconds: i64 = row.get(4)?;
    let task: Option<String> = row.get(5)?;
    let notes: Option<String> = row.get(6)?;

    let started_at = DateTime::parse_from_rfc3339(&started_at_str)
        .map_or_else(|_| Utc::now(), |t| t.with_timezone(&Utc));

    let ended_at = ended_at_str.and_then(|s| {
        DateTime::parse_from_rfc3339(&s)
            .map(|t| t.with_timezone(&Utc))
            .ok()
    });

    Ok(StudySession {
        id: Some(id),
        session_type: SessionType::parse(&session_type_str),
        started_at,
        ended_at,
        duration_seconds,
        task,
        notes,
    })
}

// Add optional() extension for rusqlite
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>, rusqlite::Error>;
}

impl<T> OptionalExt<T> for Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>, rusqlite::Error> {
        match self {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_save_and_get_active() {
        let db = Database::open_in_memory().unwrap();
        let storage = SessionStorage::new(&db);

        assert!(storage.get_active().unwrap().is_none());

        let mut session = StudySession::start(SessionType::Pomodoro, Some("algebra".to_string()));
        storage.save(&mut session).unwrap();
        assert!(session.id.is_some());

        let active = storage.get_active().unwrap().unwrap();
        assert!(active.is_active());
        assert_eq!(active.task.as_deref(), Some("algebra"));
    }

    #[test]
    fn test_finish_clears_active() {
        let db = Database::open_in_memory().unwrap();
        let storage = SessionStorage::new(&db);

        let mut session = StudySession::start(SessionType::Focus, None);
        storage.save(&mut session).unwrap();

        session.finish();
        storage.save(&mut session).unwrap();

        assert!(storage.get_active().unwrap().is_none());
    }

    #[test]
    fn test_get_recent() {
        let db = Database::open_in_memory().unwrap();
        let storage = SessionStorage::new(&db);

        for _ in 0..5 {
            let mut session = StudySession::logged(SessionType::Pomodoro, 1500, None);
            storage.save(&mut session).unwrap();
        }

        let recent = storage.get_recent(3).unwrap();
        assert_eq!(recent.len(), 3);
    }

    #[test]
    fn test_get_range_excludes_running_sessions() {
        let db = Database::open_in_memory().unwrap();
        let storage = SessionStorage::new(&db);

        let mut finished = StudySession::logged(SessionType::Pomodoro, 1500, None);
        storage.save(&mut finished).unwrap();

        let mut running = StudySession::start(SessionType::Focus, None);
        storage.save(&mut running).unwrap();

        let now = Utc::now();
        let sessions = storage
            .get_range(now - Duration::days(1), now + Duration::days(1))
            .unwrap();

        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].session_type, SessionType::Pomodoro);
    }
}
