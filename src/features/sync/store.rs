//! Persistence for the pending mutation batch.
//!
//! The batch lives in a single string-valued slot of the `sync_state` table
//! and is always read and written in full.

use rusqlite::params;

#[cfg(test)]
use mockall::automock;

use super::batch::PendingBatch;
use crate::error::StrackError;
use crate::storage::Database;

/// The `sync_state` key holding the serialized batch.
const QUEUE_KEY: &str = "offline_queue";

/// Storage for the serialized pending batch.
#[cfg_attr(test, automock)]
pub trait BatchStore {
    /// Load the persisted batch.
    ///
    /// An absent slot loads as an empty batch.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot cannot be read or parsed.
    fn load(&self) -> Result<PendingBatch, StrackError>;

    /// Persist the batch, replacing the previous slot contents.
    ///
    /// An empty batch removes the slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot cannot be written.
    fn save(&self, batch: &PendingBatch) -> Result<(), StrackError>;
}

/// `BatchStore` backed by the local `SQLite` database.
pub struct SqliteBatchStore<'a> {
    db: &'a Database,
}

impl<'a> SqliteBatchStore<'a> {
    /// Create a store over an open database.
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }
}

impl BatchStore for SqliteBatchStore<'_> {
    fn load(&self) -> Result<PendingBatch, StrackError> {
        let conn = self.db.connection();

        let mut stmt = conn
            .prepare("SELECT value FROM sync_state WHERE key = ?1")
            .map_err(|e| StrackError::Database(format!("Failed to prepare query: {e}")))?;

        let mut rows = stmt
            .query([QUEUE_KEY])
            .map_err(|e| StrackError::Database(format!("Failed to read sync state: {e}")))?;

        let Some(row) = rows
            .next()
            .map_err(|e| StrackError::Database(format!("Failed to read sync state: {e}")))?
        else {
            return Ok(PendingBatch::default());
        };

        let raw: String = row
            .get(0)
            .map_err(|e| StrackError::Database(format!("Failed to read sync state: {e}")))?;

        Ok(serde_json::from_str(&raw)?)
    }

    fn save(&self, batch: &PendingBatch) -> Result<(), StrackError> {
        let conn = self.db.connection();

        if batch.is_empty() {
            conn.execute("DELETE FROM sync_state WHERE key = ?1", [QUEUE_KEY])
                .map_err(|e| StrackError::Database(format!("Failed to clear sync state: {e}")))?;
            return Ok(());
        }

        let raw = serde_json::to_string(batch)?;

        conn.execute(
            "INSERT INTO sync_state (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![QUEUE_KEY, raw],
        )
        .map_err(|e| StrackError::Database(format!("Failed to write sync state: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_store(db: &Database) -> SqliteBatchStore<'_> {
        SqliteBatchStore::new(db)
    }

    #[test]
    fn test_load_absent_slot() {
        let db = Database::open_in_memory().unwrap();
        let store = create_test_store(&db);

        let batch = store.load().unwrap();
        assert!(batch.is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let db = Database::open_in_memory().unwrap();
        let store = create_test_store(&db);

        let mut batch = PendingBatch::default();
        batch.push_task("read chapter 4", "math");
        batch.push_session(1500, "pomodoro");

        store.save(&batch).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, batch);
    }

    #[test]
    fn test_save_overwrites_previous_slot() {
        let db = Database::open_in_memory().unwrap();
        let store = create_test_store(&db);

        let mut first = PendingBatch::default();
        first.push_task("a", "math");
        store.save(&first).unwrap();

        let mut second = PendingBatch::default();
        second.push_session(600, "focus");
        store.save(&second).unwrap();

        let loaded = store.load().unwrap();
        assert!(loaded.todos.is_empty());
        assert_eq!(loaded.study_sessions.len(), 1);
    }

    #[test]
    fn test_saving_empty_batch_removes_slot() {
        let db = Database::open_in_memory().unwrap();
        let store = create_test_store(&db);

        let mut batch = PendingBatch::default();
        batch.push_task("a", "math");
        store.save(&batch).unwrap();

        store.save(&PendingBatch::default()).unwrap();

        let count: i64 = db
            .connection()
            .query_row("SELECT COUNT(*) FROM sync_state", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_load_corrupt_slot_is_an_error() {
        let db = Database::open_in_memory().unwrap();
        db.connection()
            .execute(
                "INSERT INTO sync_state (key, value) VALUES ('offline_queue', 'not json')",
                [],
            )
            .unwrap();

        let store = create_test_store(&db);
        assert!(matches!(store.load(), Err(StrackError::Parse(_))));
    }
}
