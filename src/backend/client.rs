//! HTTP client for the hosted backend.

use std::time::Duration;

use serde::Serialize;

use crate::config::SyncConfig;
use crate::error::StrackError;
use crate::features::sync::{AccountId, PendingSession, PendingTask, RemoteStore};

/// Body for a `todo_tasks` record.
#[derive(Debug, Serialize)]
struct TaskRecord<'a> {
    title: &'a str,
    category: &'a str,
    owner_id: &'a str,
}

/// Body for a `study_sessions` record.
#[derive(Debug, Serialize)]
struct SessionRecord<'a> {
    duration_seconds: i64,
    session_type: &'a str,
    owner_id: &'a str,
}

/// Thin blocking client over the backend's record-creation endpoints.
pub struct BackendClient {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl BackendClient {
    /// Build a client from the sync configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn from_config(config: &SyncConfig) -> Result<Self, StrackError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StrackError::Backend(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.backend_url.trim_end_matches('/').to_string(),
        })
    }

    fn post_record<T: Serialize>(&self, category: &str, body: &T) -> Result<(), StrackError> {
        let url = format!("{}/records/{category}", self.base_url);

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .map_err(|e| StrackError::Backend(format!("Request to {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StrackError::Backend(format!(
                "Backend returned {status} creating {category} record"
            )));
        }

        Ok(())
    }
}

impl RemoteStore for BackendClient {
    fn create_task(&self, task: &PendingTask, owner: &AccountId) -> Result<(), StrackError> {
        self.post_record(
            "todo_tasks",
            &TaskRecord {
                title: &task.title,
                category: &task.category,
                owner_id: owner.as_str(),
            },
        )
    }

    fn create_session(
        &self,
        session: &PendingSession,
        owner: &AccountId,
    ) -> Result<(), StrackError> {
        self.post_record(
            "study_sessions",
            &SessionRecord {
                duration_seconds: session.duration_seconds,
                session_type: &session.session_type,
                owner_id: owner.as_str(),
            },
        )
    }
}
