//! The ledger ties the local store to the optional remote mirror.
//!
//! Every mutation commits to the local store first and returns; the matching
//! mirror write waits in a queue until the caller has shown the new state and
//! calls `flush_writes`. It then runs in the background and can only be
//! logged. The two copies are never reconciled and may drift apart.

mod sync;

use anyhow::Result;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::oneshot;

use crate::config::RemoteConfig;
use crate::models::{NewTransaction, Totals, Transaction};
use crate::remote::{Mirror, MirrorError, RestMirror};
use crate::store::LocalStore;

use sync::{SyncOp, SyncQueue};

/// Where the displayed ledger came from after hydration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Source {
    Remote,
    Local,
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Remote => write!(f, "remote"),
            Self::Local => write!(f, "local"),
        }
    }
}

type Snapshot = Result<Vec<Transaction>, MirrorError>;

/// A remote fetch in flight. Resolve it with `Ledger::poll_hydration` or
/// `Ledger::hydrate`.
pub(crate) struct Hydration {
    revision: u64,
    rx: oneshot::Receiver<Snapshot>,
}

pub(crate) struct Ledger {
    store: LocalStore,
    mirror: Option<Arc<dyn Mirror>>,
    sync: SyncQueue,
    // Bumped on every local mutation; a snapshot fetched under an older
    // revision is stale.
    revision: u64,
}

impl Ledger {
    pub(crate) fn new(store: LocalStore, mirror: Option<Arc<dyn Mirror>>, runtime: Handle) -> Self {
        Self {
            store,
            mirror,
            sync: SyncQueue::new(runtime),
            revision: 0,
        }
    }

    /// Build a ledger, attaching a REST mirror when `config` is present. A
    /// mirror that cannot be built is logged and left out.
    pub(crate) fn open(store: LocalStore, config: Option<&RemoteConfig>, runtime: Handle) -> Self {
        let mut ledger = Self::new(store, None, runtime);
        if let Some(config) = config {
            ledger.connect(config);
        }
        ledger
    }

    /// Attach a REST mirror for `config`. Returns whether it was attached.
    pub(crate) fn connect(&mut self, config: &RemoteConfig) -> bool {
        match RestMirror::new(config) {
            Ok(mirror) => {
                tracing::info!(endpoint = %config.endpoint, "Remote mirror configured");
                self.attach(Arc::new(mirror));
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Remote mirror unavailable, running local only");
                self.detach();
                false
            }
        }
    }

    pub(crate) fn attach(&mut self, mirror: Arc<dyn Mirror>) {
        self.mirror = Some(mirror);
    }

    pub(crate) fn detach(&mut self) {
        self.mirror = None;
    }

    pub(crate) fn is_mirrored(&self) -> bool {
        self.mirror.is_some()
    }

    pub(crate) fn store(&self) -> &LocalStore {
        &self.store
    }

    pub(crate) fn store_mut(&mut self) -> &mut LocalStore {
        &mut self.store
    }

    pub(crate) fn transactions(&self) -> &[Transaction] {
        self.store.transactions()
    }

    pub(crate) fn totals(&self) -> Totals {
        self.store.totals()
    }

    pub(crate) fn pending_writes(&self) -> usize {
        self.sync.pending()
    }

    pub(crate) fn add(&mut self, new: NewTransaction) -> Result<Transaction> {
        let txn = self.store.add(new)?;
        self.revision += 1;
        self.mirror_write(SyncOp::Insert(txn.clone()));
        Ok(txn)
    }

    /// Remove `id` locally, then ask the mirror to do the same. Returns
    /// whether the local ledger held it.
    pub(crate) fn remove(&mut self, id: i64) -> Result<bool> {
        let removed = self.store.remove(id)?;
        if removed {
            self.revision += 1;
        }
        self.mirror_write(SyncOp::Delete(id));
        Ok(removed)
    }

    fn mirror_write(&mut self, op: SyncOp) {
        if let Some(mirror) = &self.mirror {
            self.sync.enqueue(Arc::clone(mirror), op);
        }
    }

    /// Send the mirror writes queued by `add` and `remove`.
    pub(crate) fn flush_writes(&mut self) {
        self.sync.flush();
    }

    /// Start fetching the remote snapshot. `None` when no mirror is attached.
    pub(crate) fn begin_hydration(&self) -> Option<Hydration> {
        let mirror = Arc::clone(self.mirror.as_ref()?);
        let (tx, rx) = oneshot::channel();
        self.sync.runtime().spawn(async move {
            let _ = tx.send(mirror.select_all().await);
        });
        tracing::debug!("Started remote hydration");
        Some(Hydration {
            revision: self.revision,
            rx,
        })
    }

    /// Non-blocking check on a hydration; `None` while it is still running.
    pub(crate) fn poll_hydration(&mut self, hydration: &mut Hydration) -> Option<Source> {
        match hydration.rx.try_recv() {
            Ok(snapshot) => Some(self.finish_hydration(hydration.revision, snapshot)),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => {
                tracing::warn!("Remote hydration was abandoned, using local ledger");
                Some(Source::Local)
            }
        }
    }

    /// Fetch the remote snapshot and adopt it, falling back to the local
    /// ledger on any failure.
    pub(crate) async fn hydrate(&mut self) -> Source {
        let Some(hydration) = self.begin_hydration() else {
            return Source::Local;
        };
        match hydration.rx.await {
            Ok(snapshot) => self.finish_hydration(hydration.revision, snapshot),
            Err(_) => {
                tracing::warn!("Remote hydration was abandoned, using local ledger");
                Source::Local
            }
        }
    }

    fn finish_hydration(&mut self, revision: u64, snapshot: Snapshot) -> Source {
        match snapshot {
            Ok(_) if revision != self.revision => {
                tracing::warn!("Ledger changed while hydrating, keeping local ledger");
                Source::Local
            }
            Ok(txns) => {
                tracing::info!(count = txns.len(), "Hydrated ledger from remote mirror");
                self.store.replace(txns);
                Source::Remote
            }
            Err(e) => {
                tracing::warn!(error = %e, "Remote hydration failed, using local ledger");
                Source::Local
            }
        }
    }

    /// Send any queued mirror writes and wait for all of them.
    pub(crate) async fn settle(&mut self) {
        self.sync.settle().await;
    }
}
