//! Interfaces the sync manager consumes.
//!
//! The manager never reads ambient state: the remote store, the connectivity
//! signal, and the notification sink are all passed in by reference, which
//! keeps sync passes deterministic under test.

use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use colored::Colorize;

#[cfg(test)]
use mockall::automock;

use super::batch::{PendingSession, PendingTask};
use crate::error::StrackError;

/// An authenticated account identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountId(pub String);

impl AccountId {
    /// The raw identifier string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Record creation against the hosted backend.
///
/// Each call creates one remote record owned by `owner`; there is no batch
/// endpoint and no server-side deduplication.
#[cfg_attr(test, automock)]
pub trait RemoteStore {
    /// Create one `todo_tasks` record.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects or fails the request.
    fn create_task(&self, task: &PendingTask, owner: &AccountId) -> Result<(), StrackError>;

    /// Create one `study_sessions` record.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects or fails the request.
    fn create_session(&self, session: &PendingSession, owner: &AccountId)
        -> Result<(), StrackError>;
}

/// Current connectivity state of the host.
#[cfg_attr(test, automock)]
pub trait Connectivity {
    /// Whether the backend is currently reachable.
    fn is_online(&self) -> bool;
}

/// Severity of a user-visible notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// Something completed.
    Success,
    /// Something failed and will be retried.
    Error,
}

/// A user-visible notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity.
    pub kind: NoticeKind,
    /// Short headline.
    pub title: String,
    /// One-line explanation.
    pub body: String,
}

impl Notice {
    /// Build a success notice.
    #[must_use]
    pub fn success(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            title: title.into(),
            body: body.into(),
        }
    }

    /// Build an error notice.
    #[must_use]
    pub fn error(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Sink for user-visible notices.
#[cfg_attr(test, automock)]
pub trait Notifier {
    /// Deliver one notice.
    fn notify(&self, notice: &Notice);
}

/// Connectivity probe that checks TCP reachability of the backend host.
pub struct NetProbe {
    host: String,
    port: u16,
    timeout: Duration,
}

impl NetProbe {
    /// Probe `host:port` with the given timeout.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16, timeout: Duration) -> Self {
        Self {
            host: host.into(),
            port,
            timeout,
        }
    }

    /// Probe the host named by a backend base URL (port 443).
    ///
    /// Falls back to an always-offline probe when the URL has no host part.
    #[must_use]
    pub fn for_backend_url(url: &str, timeout: Duration) -> Self {
        let host = url
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .split(['/', ':'])
            .next()
            .unwrap_or_default()
            .to_string();

        Self {
            host,
            port: 443,
            timeout,
        }
    }
}

impl Connectivity for NetProbe {
    fn is_online(&self) -> bool {
        if self.host.is_empty() {
            return false;
        }

        let Ok(addrs) = (self.host.as_str(), self.port).to_socket_addrs() else {
            return false;
        };

        for addr in addrs {
            if TcpStream::connect_timeout(&addr, self.timeout).is_ok() {
                return true;
            }
        }

        false
    }
}

/// Notifier that prints colored notices to the terminal.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: &Notice) {
        let badge = match notice.kind {
            NoticeKind::Success => "✓".green(),
            NoticeKind::Error => "✗".red(),
        };
        eprintln!("{} {} {}", badge, notice.title.bold(), notice.body.dimmed());
    }
}
