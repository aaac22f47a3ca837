//! The offline sync manager.
//!
//! Drains the pending mutation batch to the hosted backend when connectivity
//! is available, pruning each category only after every entry in it was
//! submitted. Entries are not deduplicated and nothing is rolled back on a
//! partial failure, so a retried category can produce duplicate remote
//! records for the entries that went through before the failure point. That
//! matches the store contract the backend expects; callers wanting idempotent
//! delivery need client-generated record keys, which the backend does not
//! accept today.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use tracing::{debug, warn};

use super::batch::PendingBatch;
use super::remote::{AccountId, Connectivity, Notice, Notifier, RemoteStore};
use super::store::BatchStore;

/// What happened to one batch category during a sync pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryOutcome {
    /// Nothing was pending.
    Empty,
    /// Every entry was submitted and the category was pruned.
    Drained(usize),
    /// A submission failed part-way through. The category stays in the
    /// batch; `submitted` entries already reached the backend and will be
    /// sent again on the next pass.
    Failed { submitted: usize, pending: usize },
}

impl CategoryOutcome {
    /// Whether this category failed during the pass.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Entries drained by this pass (0 unless fully drained).
    #[must_use]
    pub const fn drained(&self) -> usize {
        match self {
            Self::Drained(n) => *n,
            Self::Empty | Self::Failed { .. } => 0,
        }
    }
}

/// Result of one sync pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// Outcome for the task category.
    pub todos: CategoryOutcome,
    /// Outcome for the session category.
    pub study_sessions: CategoryOutcome,
}

impl SyncReport {
    const fn idle() -> Self {
        Self {
            todos: CategoryOutcome::Empty,
            study_sessions: CategoryOutcome::Empty,
        }
    }

    /// Total entries drained across categories.
    #[must_use]
    pub const fn synced_entries(&self) -> usize {
        self.todos.drained() + self.study_sessions.drained()
    }

    /// Whether any category failed.
    #[must_use]
    pub const fn any_failed(&self) -> bool {
        self.todos.is_failed() || self.study_sessions.is_failed()
    }
}

/// Flushes the pending batch when the device comes (or already is) online.
///
/// All collaborators are injected by reference; the manager holds no ambient
/// state beyond its registration. Sync passes run single-flight: a trigger
/// arriving while a pass is active queues exactly one follow-up pass instead
/// of interleaving with the active read-modify-write of the batch.
pub struct SyncManager<'a> {
    store: &'a dyn BatchStore,
    remote: &'a dyn RemoteStore,
    connectivity: &'a dyn Connectivity,
    notifier: &'a dyn Notifier,
    identity: Mutex<Option<AccountId>>,
    last_online: AtomicBool,
    in_flight: AtomicBool,
    rerun_queued: AtomicBool,
}

impl<'a> SyncManager<'a> {
    /// Create a manager over its collaborators.
    pub fn new(
        store: &'a dyn BatchStore,
        remote: &'a dyn RemoteStore,
        connectivity: &'a dyn Connectivity,
        notifier: &'a dyn Notifier,
    ) -> Self {
        Self {
            store,
            remote,
            connectivity,
            notifier,
            identity: Mutex::new(None),
            last_online: AtomicBool::new(false),
            in_flight: AtomicBool::new(false),
            rerun_queued: AtomicBool::new(false),
        }
    }

    /// Register for an identity, replacing any previous registration.
    ///
    /// With `None` (logged out) the manager stays registered but inert.
    /// With a present identity, a sync pass runs immediately when the
    /// runtime is already online; the report of that pass is returned.
    pub fn attach(&self, identity: Option<AccountId>) -> Option<SyncReport> {
        let attached = identity.is_some();
        self.set_identity(identity);

        if !attached {
            return None;
        }

        let online = self.connectivity.is_online();
        self.last_online.store(online, Ordering::SeqCst);

        if online {
            self.try_sync()
        } else {
            debug!("attached while offline; waiting for connectivity");
            None
        }
    }

    /// Unregister. No sync passes run until the next `attach`.
    pub fn detach(&self) {
        self.set_identity(None);
    }

    /// Whether an identity is currently registered.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.current_identity().is_some()
    }

    /// Deliver a connectivity transition from the host.
    ///
    /// An offline→online transition while attached triggers a sync pass;
    /// every other transition only updates the tracked state.
    pub fn handle_connectivity_change(&self, online: bool) -> Option<SyncReport> {
        let was_online = self.last_online.swap(online, Ordering::SeqCst);

        if online && !was_online && self.is_attached() {
            self.try_sync()
        } else {
            None
        }
    }

    fn set_identity(&self, identity: Option<AccountId>) {
        match self.identity.lock() {
            Ok(mut guard) => *guard = identity,
            Err(poisoned) => *poisoned.into_inner() = identity,
        }
    }

    fn current_identity(&self) -> Option<AccountId> {
        match self.identity.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Run sync passes until no follow-up is queued.
    ///
    /// Returns the report of the first pass; queued follow-ups emit their own
    /// notices but their reports are not surfaced.
    fn try_sync(&self) -> Option<SyncReport> {
        let identity = self.current_identity()?;

        if self.in_flight.swap(true, Ordering::SeqCst) {
            // A pass is active: coalesce this trigger into one follow-up.
            self.rerun_queued.store(true, Ordering::SeqCst);
            return None;
        }

        let mut first = None;
        loop {
            let report = self.sync_pass(&identity);
            if first.is_none() {
                first = Some(report);
            }
            if !self.rerun_queued.swap(false, Ordering::SeqCst) {
                break;
            }
        }

        self.in_flight.store(false, Ordering::SeqCst);
        first
    }

    /// One drain attempt over the persisted batch.
    fn sync_pass(&self, identity: &AccountId) -> SyncReport {
        let mut batch = match self.store.load() {
            Ok(batch) => batch,
            Err(e) => {
                // An unreadable batch is treated as nothing pending; the user
                // is never notified about it.
                warn!("pending batch unreadable, treating as empty: {e}");
                return SyncReport::idle();
            }
        };

        if batch.is_empty() {
            return SyncReport::idle();
        }

        if !self.connectivity.is_online() {
            debug!("skipping sync pass: offline");
            return SyncReport::idle();
        }

        let todos = self.drain_tasks(&mut batch, identity);
        let study_sessions = self.drain_sessions(&mut batch, identity);

        let report = SyncReport {
            todos,
            study_sessions,
        };
        self.announce(&report);
        report
    }

    fn drain_tasks(&self, batch: &mut PendingBatch, identity: &AccountId) -> CategoryOutcome {
        if batch.todos.is_empty() {
            return CategoryOutcome::Empty;
        }

        let total = batch.todos.len();
        let mut submitted = 0;

        for task in &batch.todos {
            if let Err(e) = self.remote.create_task(task, identity) {
                warn!("task upload failed after {submitted}/{total}: {e}");
                return CategoryOutcome::Failed {
                    submitted,
                    pending: total,
                };
            }
            submitted += 1;
        }

        // Prune only once the persisted slot reflects it.
        let mut pruned = batch.clone();
        pruned.todos.clear();
        match self.store.save(&pruned) {
            Ok(()) => {
                *batch = pruned;
                CategoryOutcome::Drained(total)
            }
            Err(e) => {
                warn!("failed to prune drained tasks: {e}");
                CategoryOutcome::Failed {
                    submitted,
                    pending: total,
                }
            }
        }
    }

    fn drain_sessions(&self, batch: &mut PendingBatch, identity: &AccountId) -> CategoryOutcome {
        if batch.study_sessions.is_empty() {
            return CategoryOutcome::Empty;
        }

        let total = batch.study_sessions.len();
        let mut submitted = 0;

        for session in &batch.study_sessions {
            if let Err(e) = self.remote.create_session(session, identity) {
                warn!("session upload failed after {submitted}/{total}: {e}");
                return CategoryOutcome::Failed {
                    submitted,
                    pending: total,
                };
            }
            submitted += 1;
        }

        let mut pruned = batch.clone();
        pruned.study_sessions.clear();
        match self.store.save(&pruned) {
            Ok(()) => {
                *batch = pruned;
                CategoryOutcome::Drained(total)
            }
            Err(e) => {
                warn!("failed to prune drained sessions: {e}");
                CategoryOutcome::Failed {
                    submitted,
                    pending: total,
                }
            }
        }
    }

    /// Emit at most one notice per pass: an error notice when any category
    /// failed, else a success notice when at least one category drained.
    fn announce(&self, report: &SyncReport) {
        if report.any_failed() {
            self.notifier.notify(&Notice::error(
                "Sync failed",
                "Your offline changes are kept locally and will retry later",
            ));
        } else {
            let synced = report.synced_entries();
            if synced > 0 {
                let noun = if synced == 1 { "change" } else { "changes" };
                self.notifier.notify(&Notice::success(
                    "All caught up",
                    format!("Uploaded {synced} offline {noun}"),
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StrackError;
    use crate::features::sync::remote::{
        MockConnectivity, MockNotifier, MockRemoteStore, NoticeKind,
    };
    use crate::features::sync::store::SqliteBatchStore;
    use crate::storage::Database;

    fn online() -> MockConnectivity {
        let mut connectivity = MockConnectivity::new();
        connectivity.expect_is_online().return_const(true);
        connectivity
    }

    fn offline() -> MockConnectivity {
        let mut connectivity = MockConnectivity::new();
        connectivity.expect_is_online().return_const(false);
        connectivity
    }

    fn silent() -> MockNotifier {
        let mut notifier = MockNotifier::new();
        notifier.expect_notify().times(0);
        notifier
    }

    fn expect_one(kind: NoticeKind) -> MockNotifier {
        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .withf(move |n| n.kind == kind)
            .times(1)
            .return_const(());
        notifier
    }

    fn seed(db: &Database, batch: &PendingBatch) {
        SqliteBatchStore::new(db).save(batch).unwrap();
    }

    fn account() -> AccountId {
        AccountId::from("learner-42")
    }

    #[test]
    fn test_empty_batch_issues_no_calls_and_no_notice() {
        let db = Database::open_in_memory().unwrap();
        let store = SqliteBatchStore::new(&db);

        let mut remote = MockRemoteStore::new();
        remote.expect_create_task().times(0);
        remote.expect_create_session().times(0);

        let connectivity = online();
        let notifier = silent();

        let manager = SyncManager::new(&store, &remote, &connectivity, &notifier);
        let report = manager.attach(Some(account())).unwrap();

        assert_eq!(report, SyncReport::idle());
    }

    #[test]
    fn test_drains_todos_and_prunes_only_that_category() {
        let db = Database::open_in_memory().unwrap();
        let store = SqliteBatchStore::new(&db);

        let mut batch = PendingBatch::default();
        batch.push_task("read chapter 4", "math");
        batch.push_task("flashcards", "biology");
        batch.push_task("past paper", "math");
        seed(&db, &batch);

        let mut remote = MockRemoteStore::new();
        remote
            .expect_create_task()
            .withf(|_, owner| owner.as_str() == "learner-42")
            .times(3)
            .returning(|_, _| Ok(()));
        remote.expect_create_session().times(0);

        let connectivity = online();
        let notifier = expect_one(NoticeKind::Success);

        let manager = SyncManager::new(&store, &remote, &connectivity, &notifier);
        let report = manager.attach(Some(account())).unwrap();

        assert_eq!(report.todos, CategoryOutcome::Drained(3));
        assert_eq!(report.study_sessions, CategoryOutcome::Empty);
        assert_eq!(report.synced_entries(), 3);

        let remaining = store.load().unwrap();
        assert!(remaining.is_empty());
    }

    #[test]
    fn test_failed_submission_keeps_category_and_retries_from_the_top() {
        let db = Database::open_in_memory().unwrap();
        let store = SqliteBatchStore::new(&db);

        let mut batch = PendingBatch::default();
        batch.push_task("first", "math");
        batch.push_task("second", "math");
        seed(&db, &batch);

        // First pass: entry 1 succeeds, entry 2 fails.
        let mut remote = MockRemoteStore::new();
        let mut calls = 0;
        remote.expect_create_task().times(2).returning(move |_, _| {
            calls += 1;
            if calls == 2 {
                Err(StrackError::Backend("503".to_string()))
            } else {
                Ok(())
            }
        });

        let connectivity = online();
        let notifier = expect_one(NoticeKind::Error);

        let manager = SyncManager::new(&store, &remote, &connectivity, &notifier);
        let report = manager.attach(Some(account())).unwrap();

        assert_eq!(
            report.todos,
            CategoryOutcome::Failed {
                submitted: 1,
                pending: 2
            }
        );

        // Category was not pruned.
        let remaining = store.load().unwrap();
        assert_eq!(remaining.todos.len(), 2);

        // Retry pass: BOTH entries are submitted again; the duplicate of the
        // first entry is accepted behavior.
        let mut remote = MockRemoteStore::new();
        remote
            .expect_create_task()
            .times(2)
            .returning(|_, _| Ok(()));

        let connectivity = online();
        let notifier = expect_one(NoticeKind::Success);

        let manager = SyncManager::new(&store, &remote, &connectivity, &notifier);
        let report = manager.attach(Some(account())).unwrap();

        assert_eq!(report.todos, CategoryOutcome::Drained(2));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_offline_pass_is_a_noop() {
        let db = Database::open_in_memory().unwrap();
        let store = SqliteBatchStore::new(&db);

        let mut batch = PendingBatch::default();
        batch.push_task("read chapter 4", "math");
        seed(&db, &batch);

        let mut remote = MockRemoteStore::new();
        remote.expect_create_task().times(0);
        remote.expect_create_session().times(0);

        let connectivity = offline();
        let notifier = silent();

        let manager = SyncManager::new(&store, &remote, &connectivity, &notifier);
        assert!(manager.attach(Some(account())).is_none());

        // Batch untouched.
        assert_eq!(store.load().unwrap().todos.len(), 1);
    }

    #[test]
    fn test_offline_guard_inside_the_pass() {
        // The transition fires but the probe reports offline again by the
        // time the pass runs; the pass must bail before any network call.
        let db = Database::open_in_memory().unwrap();
        let store = SqliteBatchStore::new(&db);

        let mut batch = PendingBatch::default();
        batch.push_task("read chapter 4", "math");
        seed(&db, &batch);

        let mut remote = MockRemoteStore::new();
        remote.expect_create_task().times(0);

        let connectivity = offline();
        let notifier = silent();

        let manager = SyncManager::new(&store, &remote, &connectivity, &notifier);
        manager.set_identity(Some(account()));

        let report = manager.handle_connectivity_change(true).unwrap();
        assert_eq!(report, SyncReport::idle());
        assert_eq!(store.load().unwrap().todos.len(), 1);
    }

    #[test]
    fn test_logged_out_attach_never_syncs() {
        let db = Database::open_in_memory().unwrap();
        let store = SqliteBatchStore::new(&db);

        let mut batch = PendingBatch::default();
        batch.push_task("read chapter 4", "math");
        seed(&db, &batch);

        let mut remote = MockRemoteStore::new();
        remote.expect_create_task().times(0);
        remote.expect_create_session().times(0);

        let connectivity = online();
        let notifier = silent();

        let manager = SyncManager::new(&store, &remote, &connectivity, &notifier);
        assert!(manager.attach(None).is_none());
        assert!(!manager.is_attached());

        // A later transition does not sync either.
        assert!(manager.handle_connectivity_change(false).is_none());
        assert!(manager.handle_connectivity_change(true).is_none());
        assert_eq!(store.load().unwrap().todos.len(), 1);
    }

    #[test]
    fn test_pruning_tasks_leaves_pending_sessions_untouched() {
        let db = Database::open_in_memory().unwrap();
        let store = SqliteBatchStore::new(&db);

        let mut batch = PendingBatch::default();
        batch.push_task("read chapter 4", "math");
        batch.push_session(1500, "pomodoro");
        batch.push_session(600, "focus");
        seed(&db, &batch);

        let mut remote = MockRemoteStore::new();
        remote
            .expect_create_task()
            .times(1)
            .returning(|_, _| Ok(()));
        remote
            .expect_create_session()
            .times(1)
            .returning(|_, _| Err(StrackError::Backend("timeout".to_string())));

        let connectivity = online();
        // One category drained, the other failed: the error notice wins.
        let notifier = expect_one(NoticeKind::Error);

        let manager = SyncManager::new(&store, &remote, &connectivity, &notifier);
        let report = manager.attach(Some(account())).unwrap();

        assert_eq!(report.todos, CategoryOutcome::Drained(1));
        assert!(report.study_sessions.is_failed());

        let remaining = store.load().unwrap();
        assert!(remaining.todos.is_empty());
        assert_eq!(remaining.study_sessions.len(), 2);
    }

    #[test]
    fn test_task_failure_does_not_block_the_session_attempt() {
        let db = Database::open_in_memory().unwrap();
        let store = SqliteBatchStore::new(&db);

        let mut batch = PendingBatch::default();
        batch.push_task("read chapter 4", "math");
        batch.push_session(1500, "pomodoro");
        seed(&db, &batch);

        let mut remote = MockRemoteStore::new();
        remote
            .expect_create_task()
            .times(1)
            .returning(|_, _| Err(StrackError::Backend("500".to_string())));
        remote
            .expect_create_session()
            .times(1)
            .returning(|_, _| Ok(()));

        let connectivity = online();
        let notifier = expect_one(NoticeKind::Error);

        let manager = SyncManager::new(&store, &remote, &connectivity, &notifier);
        let report = manager.attach(Some(account())).unwrap();

        assert!(report.todos.is_failed());
        assert_eq!(report.study_sessions, CategoryOutcome::Drained(1));

        let remaining = store.load().unwrap();
        assert_eq!(remaining.todos.len(), 1);
        assert!(remaining.study_sessions.is_empty());
    }

    #[test]
    fn test_both_categories_drained_emits_one_notice() {
        let db = Database::open_in_memory().unwrap();
        let store = SqliteBatchStore::new(&db);

        let mut batch = PendingBatch::default();
        batch.push_task("read chapter 4", "math");
        batch.push_session(1500, "pomodoro");
        seed(&db, &batch);

        let mut remote = MockRemoteStore::new();
        remote
            .expect_create_task()
            .times(1)
            .returning(|_, _| Ok(()));
        remote
            .expect_create_session()
            .times(1)
            .returning(|_, _| Ok(()));

        let connectivity = online();

        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .withf(|n| n.kind == NoticeKind::Success && n.body.contains('2'))
            .times(1)
            .return_const(());

        let manager = SyncManager::new(&store, &remote, &connectivity, &notifier);
        let report = manager.attach(Some(account())).unwrap();

        assert_eq!(report.synced_entries(), 2);
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_slot_is_treated_as_nothing_pending() {
        let db = Database::open_in_memory().unwrap();
        db.connection()
            .execute(
                "INSERT INTO sync_state (key, value) VALUES ('offline_queue', 'not json')",
                [],
            )
            .unwrap();
        let store = SqliteBatchStore::new(&db);

        let mut remote = MockRemoteStore::new();
        remote.expect_create_task().times(0);
        remote.expect_create_session().times(0);

        let connectivity = online();
        let notifier = silent();

        let manager = SyncManager::new(&store, &remote, &connectivity, &notifier);
        let report = manager.attach(Some(account())).unwrap();
        assert_eq!(report, SyncReport::idle());

        // The slot itself is left alone.
        let raw: String = db
            .connection()
            .query_row(
                "SELECT value FROM sync_state WHERE key = 'offline_queue'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(raw, "not json");
    }

    #[test]
    fn test_detach_stops_future_syncs() {
        let db = Database::open_in_memory().unwrap();
        let store = SqliteBatchStore::new(&db);

        let mut batch = PendingBatch::default();
        batch.push_task("read chapter 4", "math");
        seed(&db, &batch);

        let mut remote = MockRemoteStore::new();
        remote.expect_create_task().times(0);

        let connectivity = offline();
        let notifier = silent();

        let manager = SyncManager::new(&store, &remote, &connectivity, &notifier);
        manager.attach(Some(account()));
        assert!(manager.is_attached());

        manager.detach();
        assert!(!manager.is_attached());
        assert!(manager.handle_connectivity_change(true).is_none());
    }

    #[test]
    fn test_only_an_offline_to_online_transition_triggers() {
        let db = Database::open_in_memory().unwrap();
        let store = SqliteBatchStore::new(&db);

        let mut batch = PendingBatch::default();
        batch.push_task("read chapter 4", "math");
        seed(&db, &batch);

        let mut remote = MockRemoteStore::new();
        // Exactly one sync: at attach time. The online→online event must not
        // trigger another.
        remote
            .expect_create_task()
            .times(1)
            .returning(|_, _| Ok(()));

        let connectivity = online();
        let notifier = expect_one(NoticeKind::Success);

        let manager = SyncManager::new(&store, &remote, &connectivity, &notifier);
        manager.attach(Some(account()));

        assert!(manager.handle_connectivity_change(true).is_none());
    }

    #[test]
    fn test_trigger_during_active_pass_is_coalesced() {
        let db = Database::open_in_memory().unwrap();
        let store = SqliteBatchStore::new(&db);

        let mut batch = PendingBatch::default();
        batch.push_task("read chapter 4", "math");
        seed(&db, &batch);

        let mut remote = MockRemoteStore::new();
        // Drained once by the first pass; the queued follow-up pass sees an
        // empty batch and makes no further calls.
        remote
            .expect_create_task()
            .times(1)
            .returning(|_, _| Ok(()));

        let connectivity = online();
        let notifier = expect_one(NoticeKind::Success);

        let manager = SyncManager::new(&store, &remote, &connectivity, &notifier);
        manager.set_identity(Some(account()));
        manager.last_online.store(false, Ordering::SeqCst);

        // Simulate a pass in flight: the transition must not start a second
        // interleaved pass, only queue a follow-up.
        manager.in_flight.store(true, Ordering::SeqCst);
        assert!(manager.handle_connectivity_change(true).is_none());
        assert!(manager.rerun_queued.load(Ordering::SeqCst));

        // The active pass finishes; the next trigger runs the first pass and
        // the queued follow-up back to back.
        manager.in_flight.store(false, Ordering::SeqCst);
        manager.last_online.store(false, Ordering::SeqCst);
        let report = manager.handle_connectivity_change(true).unwrap();

        assert_eq!(report.todos, CategoryOutcome::Drained(1));
        assert!(!manager.rerun_queued.load(Ordering::SeqCst));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_attach_is_repeatable_as_identity_changes() {
        let db = Database::open_in_memory().unwrap();
        let store = SqliteBatchStore::new(&db);

        let mut remote = MockRemoteStore::new();
        remote.expect_create_task().times(0);
        remote.expect_create_session().times(0);

        let connectivity = online();
        let notifier = silent();

        let manager = SyncManager::new(&store, &remote, &connectivity, &notifier);

        manager.attach(Some(AccountId::from("first")));
        manager.attach(Some(AccountId::from("second")));
        assert_eq!(manager.current_identity(), Some(AccountId::from("second")));

        manager.attach(None);
        assert!(!manager.is_attached());
    }
}
