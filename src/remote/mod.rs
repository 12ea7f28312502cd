//! The optional remote mirror: a hosted table that receives a best-effort
//! copy of every local write. Nothing here can fail the local ledger.

mod record;
mod rest;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::Transaction;

pub(crate) use record::{RemoteInsert, RemoteRow};
pub(crate) use rest::RestMirror;

#[derive(Error, Debug)]
pub(crate) enum MirrorError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Remote returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed remote record: {0}")]
    Malformed(String),

    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(String),
}

/// The three operations the ledger needs from a remote store.
#[async_trait]
pub(crate) trait Mirror: Send + Sync {
    /// Every remote row, normalized, newest date first.
    async fn select_all(&self) -> Result<Vec<Transaction>, MirrorError>;

    async fn insert_one(&self, txn: &Transaction) -> Result<(), MirrorError>;

    async fn delete_by_id(&self, id: i64) -> Result<(), MirrorError>;
}

#[cfg(test)]
mod tests;
