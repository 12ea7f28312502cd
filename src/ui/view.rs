//! Read-only projection of the ledger for display.

use crate::models::Transaction;

use super::util::{format_date, format_signed};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DisplayRow {
    pub(crate) id: i64,
    pub(crate) category: &'static str,
    pub(crate) description: String,
    pub(crate) date: String,
    pub(crate) amount: String,
    pub(crate) is_income: bool,
}

impl DisplayRow {
    pub(crate) fn from_txn(txn: &Transaction) -> Self {
        Self {
            id: txn.id,
            category: txn.category.label(),
            description: txn.description_or_placeholder().to_string(),
            date: format_date(txn.date),
            amount: format_signed(txn.amount, txn.is_income()),
            is_income: txn.is_income(),
        }
    }
}

/// One row per transaction, keeping the ledger's newest-first order.
pub(crate) fn project(txns: &[Transaction]) -> Vec<DisplayRow> {
    txns.iter().map(DisplayRow::from_txn).collect()
}
