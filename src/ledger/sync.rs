use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::models::Transaction;
use crate::remote::Mirror;

/// A write to replay on the mirror after the local ledger has committed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SyncOp {
    Insert(Transaction),
    Delete(i64),
}

/// Fire-and-forget mirror writes.
///
/// Writes are queued by `enqueue` and only leave the process on `flush`, so
/// the caller can update its view of the ledger first. A flushed write runs
/// on the runtime and its outcome is only logged. Handles are kept so the
/// process can `settle` before exit.
pub(crate) struct SyncQueue {
    runtime: Handle,
    queued: Vec<(Arc<dyn Mirror>, SyncOp)>,
    in_flight: Vec<JoinHandle<()>>,
}

impl SyncQueue {
    pub(crate) fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            queued: Vec::new(),
            in_flight: Vec::new(),
        }
    }

    pub(crate) fn runtime(&self) -> &Handle {
        &self.runtime
    }

    pub(crate) fn enqueue(&mut self, mirror: Arc<dyn Mirror>, op: SyncOp) {
        self.queued.push((mirror, op));
    }

    /// Start every queued write, in the order they were queued.
    pub(crate) fn flush(&mut self) {
        if self.queued.is_empty() {
            return;
        }
        self.in_flight.retain(|h| !h.is_finished());
        for (mirror, op) in self.queued.drain(..) {
            tracing::debug!(?op, "Dispatching mirror write");
            self.in_flight.push(self.runtime.spawn(run(mirror, op)));
        }
    }

    /// Writes queued or running.
    pub(crate) fn pending(&self) -> usize {
        self.queued.len() + self.in_flight.iter().filter(|h| !h.is_finished()).count()
    }

    /// Flush anything still queued and wait for every write to finish.
    pub(crate) async fn settle(&mut self) {
        self.flush();
        let handles: Vec<_> = self.in_flight.drain(..).collect();
        if !handles.is_empty() {
            tracing::debug!(count = handles.len(), "Waiting for mirror writes");
        }
        for handle in handles {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "Mirror write task panicked");
            }
        }
    }
}

async fn run(mirror: Arc<dyn Mirror>, op: SyncOp) {
    match op {
        SyncOp::Insert(txn) => match mirror.insert_one(&txn).await {
            Ok(()) => tracing::info!(id = txn.id, "Mirrored new transaction"),
            Err(e) => tracing::warn!(id = txn.id, error = %e, "Mirror insert failed, kept locally"),
        },
        SyncOp::Delete(id) => match mirror.delete_by_id(id).await {
            Ok(()) => tracing::info!(id, "Mirrored deletion"),
            Err(e) => tracing::warn!(id, error = %e, "Mirror delete failed"),
        },
    }
}
