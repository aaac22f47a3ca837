//! Shared helpers for command implementations.

use std::time::Duration;

use tracing::warn;

use crate::backend::BackendClient;
use crate::config::Config;
use crate::error::StrackError;
use crate::features::sync::{
    AccountId, BatchStore, Connectivity, NetProbe, PendingSession, PendingTask, RemoteStore,
    SqliteBatchStore,
};
use crate::storage::Database;

/// How long the connectivity probe waits before calling the host offline.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Where a captured change ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Sync is disabled or nobody is signed in; the change stays local.
    LocalOnly,
    /// Uploaded to the backend right away.
    Uploaded,
    /// Buffered for the next sync pass.
    Buffered,
}

impl Delivery {
    /// Suffix appended to command output describing what happened.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::LocalOnly => "",
            Self::Uploaded => " (uploaded)",
            Self::Buffered => " (buffered for sync)",
        }
    }
}

/// Mutations the offline buffer accepts.
pub enum Mutation {
    /// A task capture.
    Task(PendingTask),
    /// A session recording.
    Session(PendingSession),
}

/// Upload a mutation now, or buffer it for the next sync pass.
///
/// Signed-out users keep everything local. Signed-in users get a direct
/// upload when the backend is reachable; on any failure the mutation lands
/// in the offline buffer instead of being lost.
///
/// # Errors
///
/// Returns an error if the offline buffer cannot be written.
pub fn deliver(config: &Config, db: &Database, mutation: Mutation) -> Result<Delivery, StrackError> {
    let Some(account) = config.sync_identity() else {
        return Ok(Delivery::LocalOnly);
    };
    let account = AccountId(account);

    let probe = NetProbe::for_backend_url(&config.sync.backend_url, PROBE_TIMEOUT);
    if probe.is_online() {
        match try_upload(config, &mutation, &account) {
            Ok(()) => return Ok(Delivery::Uploaded),
            Err(e) => warn!("direct upload failed, buffering instead: {e}"),
        }
    }

    let store = SqliteBatchStore::new(db);
    let mut batch = match store.load() {
        Ok(batch) => batch,
        Err(e) => {
            warn!("pending batch unreadable, starting a fresh one: {e}");
            crate::features::sync::PendingBatch::default()
        }
    };

    match mutation {
        Mutation::Task(task) => batch.todos.push(task),
        Mutation::Session(session) => batch.study_sessions.push(session),
    }

    store.save(&batch)?;
    Ok(Delivery::Buffered)
}

fn try_upload(config: &Config, mutation: &Mutation, account: &AccountId) -> Result<(), StrackError> {
    let client = BackendClient::from_config(&config.sync)?;
    match mutation {
        Mutation::Task(task) => client.create_task(task, account),
        Mutation::Session(session) => client.create_session(session, account),
    }
}

/// Open the default database, creating directories as needed.
///
/// # Errors
///
/// Returns an error if paths cannot be resolved or the database fails to
/// open.
pub fn open_database() -> Result<Database, StrackError> {
    Database::open()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logged_out_delivery_is_local_only() {
        let db = Database::open_in_memory().unwrap();
        let config = Config::default();

        let delivery = deliver(
            &config,
            &db,
            Mutation::Task(PendingTask {
                title: "read chapter 4".to_string(),
                category: "math".to_string(),
            }),
        )
        .unwrap();

        assert_eq!(delivery, Delivery::LocalOnly);

        // Nothing was buffered either.
        let batch = SqliteBatchStore::new(&db).load().unwrap();
        assert!(batch.is_empty());
    }

    #[test]
    fn test_signed_in_but_unreachable_backend_buffers() {
        let db = Database::open_in_memory().unwrap();

        let mut config = Config::default();
        config.sync.enabled = true;
        config.sync.account = Some("learner-42".to_string());
        // A URL with no host makes the probe report offline immediately.
        config.sync.backend_url = String::new();

        let delivery = deliver(
            &config,
            &db,
            Mutation::Session(PendingSession {
                duration_seconds: 1500,
                session_type: "pomodoro".to_string(),
            }),
        )
        .unwrap();

        assert_eq!(delivery, Delivery::Buffered);

        let batch = SqliteBatchStore::new(&db).load().unwrap();
        assert_eq!(batch.study_sessions.len(), 1);
    }

    #[test]
    fn test_buffered_mutations_append_in_order() {
        let db = Database::open_in_memory().unwrap();

        let mut config = Config::default();
        config.sync.enabled = true;
        config.sync.account = Some("learner-42".to_string());
        config.sync.backend_url = String::new();

        for title in ["first", "second"] {
            deliver(
                &config,
                &db,
                Mutation::Task(PendingTask {
                    title: title.to_string(),
                    category: "math".to_string(),
                }),
            )
            .unwrap();
        }

        let batch = SqliteBatchStore::new(&db).load().unwrap();
        assert_eq!(batch.todos.len(), 2);
        assert_eq!(batch.todos[0].title, "first");
        assert_eq!(batch.todos[1].title, "second");
    }
}
