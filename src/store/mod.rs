//! The local ledger: an ordered, newest-first list of transactions that is
//! re-serialized in full to the key-value database after every mutation.

use anyhow::{Context, Result};

use crate::db::{schema, Database};
use crate::models::{NewTransaction, Totals, Transaction};

pub(crate) struct LocalStore {
    db: Database,
    txns: Vec<Transaction>,
}

impl LocalStore {
    /// Read the persisted ledger. Missing or unreadable data yields an empty
    /// ledger; this never fails.
    pub(crate) fn load(db: Database) -> Self {
        let txns = match db.get(schema::KEY_LEDGER) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Transaction>>(&raw) {
                Ok(txns) => txns,
                Err(e) => {
                    tracing::warn!(error = %e, "Stored ledger is malformed, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Could not read stored ledger, starting empty");
                Vec::new()
            }
        };
        tracing::info!(count = txns.len(), "Loaded local ledger");
        Self { db, txns }
    }

    pub(crate) fn db(&self) -> &Database {
        &self.db
    }

    pub(crate) fn db_mut(&mut self) -> &mut Database {
        &mut self.db
    }

    pub(crate) fn transactions(&self) -> &[Transaction] {
        &self.txns
    }

    #[cfg(test)]
    pub(crate) fn get(&self, id: i64) -> Option<&Transaction> {
        self.txns.iter().find(|t| t.id == id)
    }

    pub(crate) fn add(&mut self, new: NewTransaction) -> Result<Transaction> {
        self.add_at(new, chrono::Utc::now().timestamp_millis())
    }

    /// Store `new` with an id derived from `now_ms`, bumped past every id
    /// already held so ids stay unique.
    pub(crate) fn add_at(&mut self, new: NewTransaction, now_ms: i64) -> Result<Transaction> {
        let id = match self.txns.iter().map(|t| t.id).max() {
            Some(max) if max >= now_ms => max + 1,
            _ => now_ms,
        };
        let txn = new.with_id(id);

        let mut next = Vec::with_capacity(self.txns.len() + 1);
        next.push(txn.clone());
        next.extend(self.txns.iter().cloned());
        self.commit(next)?;

        tracing::info!(id, kind = txn.txn_type.as_str(), amount = %txn.amount, "Added transaction");
        Ok(txn)
    }

    /// Drop `id` from the ledger. Returns `false` (and writes nothing) when
    /// there was no such transaction.
    pub(crate) fn remove(&mut self, id: i64) -> Result<bool> {
        if !self.txns.iter().any(|t| t.id == id) {
            tracing::debug!(id, "Remove skipped, id not in ledger");
            return Ok(false);
        }
        let next: Vec<Transaction> = self.txns.iter().filter(|t| t.id != id).cloned().collect();
        self.commit(next)?;
        tracing::info!(id, "Removed transaction");
        Ok(true)
    }

    pub(crate) fn totals(&self) -> Totals {
        Totals::of(&self.txns)
    }

    /// Adopt `txns` as the in-memory ledger without writing it. The next
    /// mutation persists the whole list.
    pub(crate) fn replace(&mut self, txns: Vec<Transaction>) {
        self.txns = txns;
    }

    // Persist first so a failed write leaves memory untouched.
    fn commit(&mut self, next: Vec<Transaction>) -> Result<()> {
        let raw = serde_json::to_string(&next).context("Failed to serialize ledger")?;
        self.db
            .set(schema::KEY_LEDGER, &raw)
            .context("Failed to persist ledger")?;
        self.txns = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests;
