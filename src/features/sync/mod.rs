//! Offline-first synchronization with the hosted backend.
//!
//! Task captures and session recordings made while offline are buffered in a
//! durable pending batch and flushed when connectivity returns.
//!
//! Features:
//! - Append-only pending batch with independent `todos` / `studySessions`
//!   categories
//! - All-or-nothing pruning per category after a successful drain
//! - Single-flight sync passes (concurrent triggers coalesce)
//! - One user-visible notice per pass

pub mod batch;
pub mod manager;
pub mod remote;
pub mod store;

pub use batch::{PendingBatch, PendingSession, PendingTask};
pub use manager::{CategoryOutcome, SyncManager, SyncReport};
pub use remote::{
    AccountId, Connectivity, ConsoleNotifier, NetProbe, Notice, NoticeKind, Notifier, RemoteStore,
};
pub use store::{BatchStore, SqliteBatchStore};
