use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Category;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum TxnType {
    #[serde(alias = "entrada")]
    Income,
    #[serde(alias = "saida", alias = "saída")]
    Expense,
}

impl TxnType {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Value stored in the mirror table's `tipo` column.
    pub(crate) fn remote_name(&self) -> &'static str {
        match self {
            Self::Income => "entrada",
            Self::Expense => "saida",
        }
    }

    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" | "in" | "entrada" => Some(Self::Income),
            "expense" | "out" | "saida" | "saída" => Some(Self::Expense),
            _ => None,
        }
    }

    pub(crate) fn toggle(&self) -> Self {
        match self {
            Self::Income => Self::Expense,
            Self::Expense => Self::Income,
        }
    }
}

impl std::fmt::Display for TxnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Income => write!(f, "Income"),
            Self::Expense => write!(f, "Expense"),
        }
    }
}

/// A transaction that passed form validation but has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NewTransaction {
    pub(crate) txn_type: TxnType,
    pub(crate) category: Category,
    pub(crate) description: Option<String>,
    pub(crate) amount: Decimal,
    pub(crate) date: NaiveDate,
}

impl NewTransaction {
    pub(crate) fn with_id(self, id: i64) -> Transaction {
        Transaction {
            id,
            txn_type: self.txn_type,
            category: self.category,
            description: self.description,
            amount: self.amount,
            date: self.date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Transaction {
    pub(crate) id: i64,
    #[serde(rename = "type")]
    pub(crate) txn_type: TxnType,
    pub(crate) category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) description: Option<String>,
    pub(crate) amount: Decimal,
    pub(crate) date: NaiveDate,
}

impl Transaction {
    pub(crate) const NO_DESCRIPTION: &'static str = "No description";

    pub(crate) fn is_income(&self) -> bool {
        self.txn_type == TxnType::Income
    }

    /// Contribution to the balance: positive for income, negative for expense.
    pub(crate) fn signed_amount(&self) -> Decimal {
        match self.txn_type {
            TxnType::Income => self.amount,
            TxnType::Expense => -self.amount,
        }
    }

    /// Blank descriptions count as missing.
    pub(crate) fn description_or_placeholder(&self) -> &str {
        self.description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .unwrap_or(Self::NO_DESCRIPTION)
    }

    /// Strip the id, e.g. to compare a stored row with what was submitted.
    #[cfg(test)]
    pub(crate) fn to_new(&self) -> NewTransaction {
        NewTransaction {
            txn_type: self.txn_type,
            category: self.category,
            description: self.description.clone(),
            amount: self.amount,
            date: self.date,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Totals {
    pub(crate) income: Decimal,
    pub(crate) expense: Decimal,
    pub(crate) balance: Decimal,
}

impl Totals {
    pub(crate) fn of(txns: &[Transaction]) -> Self {
        let mut totals = Self::default();
        for txn in txns {
            match txn.txn_type {
                TxnType::Income => totals.income += txn.amount,
                TxnType::Expense => totals.expense += txn.amount,
            }
            totals.balance += txn.signed_amount();
        }
        totals
    }
}
