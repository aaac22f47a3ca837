//! Task storage.
//!
//! Persists captured tasks to the local database.

use chrono::{DateTime, Utc};
use rusqlite::{params, Row};

use super::task::Task;
use crate::error::StrackError;
use crate::storage::Database;

/// Storage for captured tasks.
pub struct TaskStorage<'a> {
    db: &'a Database,
}

impl<'a> TaskStorage<'a> {
    /// Create storage over an open database.
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Insert a new task, assigning its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the task cannot be saved.
    pub fn insert(&self, task: &mut Task) -> Result<(), StrackError> {
        let conn = self.db.connection();

        conn.execute(
            r"INSERT INTO tasks (title, category, done, created_at)
              VALUES (?1, ?2, ?3, ?4)",
            params![
                task.title,
                task.category,
                task.done,
                task.created_at.to_rfc3339(),
            ],
        )
        .map_err(|e| StrackError::Database(format!("Failed to insert task: {e}")))?;

        task.id = Some(conn.last_insert_rowid());
        Ok(())
    }

    /// Get a task by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get(&self, id: i64) -> Result<Option<Task>, StrackError> {
        let conn = self.db.connection();

        let mut stmt = conn
            .prepare(
                r"SELECT id, title, category, done, created_at
                  FROM tasks WHERE id = ?1",
            )
            .map_err(|e| StrackError::Database(format!("Failed to prepare query: {e}")))?;

        let result = stmt
            .query_row([id], row_to_task)
            .optional()
            .map_err(|e| StrackError::Database(format!("Failed to query task: {e}")))?;

        Ok(result)
    }

    /// List tasks, open ones first, newest first within each group.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list(&self, include_done: bool, category: Option<&str>) -> Result<Vec<Task>, StrackError> {
        let conn = self.db.connection();

        let mut sql = String::from(
            r"SELECT id, title, category, done, created_at
              FROM tasks WHERE 1=1",
        );
        if !include_done {
            sql.push_str(" AND done = 0");
        }
        if category.is_some() {
            sql.push_str(" AND category = ?1");
        }
        sql.push_str(" ORDER BY done ASC, created_at DESC");

        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| StrackError::Database(format!("Failed to prepare query: {e}")))?;

        let params: Vec<&dyn rusqlite::ToSql> = match category {
            Some(ref cat) => vec![cat as &dyn rusqlite::ToSql],
            None => Vec::new(),
        };

        let rows = stmt
            .query_map(params.as_slice(), row_to_task)
            .map_err(|e| StrackError::Database(format!("Failed to query tasks: {e}")))?;

        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row.map_err(|e| StrackError::Database(e.to_string()))?);
        }

        Ok(tasks)
    }

    /// Mark a task as done.
    ///
    /// Returns `false` if no task with that ID exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn complete(&self, id: i64) -> Result<bool, StrackError> {
        let conn = self.db.connection();

        let rows = conn
            .execute("UPDATE tasks SET done = 1 WHERE id = ?1", [id])
            .map_err(|e| StrackError::Database(format!("Failed to complete task: {e}")))?;

        Ok(rows > 0)
    }

    /// Delete a task.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete(&self, id: i64) -> Result<bool, StrackError> {
        let conn = self.db.connection();

        let rows = conn
            .execute("DELETE FROM tasks WHERE id = ?1", [id])
            .map_err(|e| StrackError::Database(format!("Failed to delete task: {e}")))?;

        Ok(rows > 0)
    }
}

/// Convert a database row to a Task.
fn row_to_task(row: &Row<'_>) -> Result<Task, rusqlite::Error> {
    let id: i64 = row.get(0)?;
    let title: String = row.get(1)?;
    let category: String = row.get(2)?;
    let done: bool = row.get(3)?;
    let created_at_str: String = row.get(4)?;

    let created_at = DateTime::parse_from_rfc3339(&created_at_str)
        .map_or_else(|_| Utc::now(), |t| t.with_timezone(&Utc));

    Ok(Task {
        id: Some(id),
        title,
        category,
        done,
        created_at,
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
