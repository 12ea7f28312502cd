use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::MirrorError;
use crate::models::{Category, Transaction, TxnType};

/// Outgoing row, with the remote table's column names and values.
#[derive(Debug, Serialize)]
pub(crate) struct RemoteInsert<'a> {
    pub(crate) tipo: &'static str,
    pub(crate) categoria: &'static str,
    pub(crate) descricao: Option<&'a str>,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub(crate) valor: Decimal,
    pub(crate) data: NaiveDate,
}

impl<'a> From<&'a Transaction> for RemoteInsert<'a> {
    fn from(txn: &'a Transaction) -> Self {
        Self {
            tipo: txn.txn_type.remote_name(),
            categoria: txn.category.remote_name(),
            descricao: txn.description.as_deref(),
            valor: txn.amount,
            data: txn.date,
        }
    }
}

/// Incoming row. Older rows may carry the local field names instead of the
/// remote ones, so both spellings are read and folded by `normalize`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RemoteRow {
    #[serde(default)]
    id: Option<serde_json::Value>,
    #[serde(default)]
    tipo: Option<TxnType>,
    #[serde(default, rename = "type")]
    type_: Option<TxnType>,
    #[serde(default)]
    categoria: Option<Category>,
    #[serde(default)]
    category: Option<Category>,
    #[serde(default)]
    descricao: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    valor: Option<Decimal>,
    #[serde(default)]
    amount: Option<Decimal>,
    #[serde(default)]
    data: Option<String>,
    #[serde(default)]
    date: Option<String>,
}

impl RemoteRow {
    pub(crate) fn normalize(self) -> Result<Transaction, MirrorError> {
        let id = self
            .id
            .as_ref()
            .and_then(|v| match v {
                serde_json::Value::Number(n) => n.as_i64(),
                serde_json::Value::String(s) => s.parse().ok(),
                _ => None,
            })
            .ok_or_else(|| MirrorError::Malformed(format!("unusable id: {:?}", self.id)))?;

        let txn_type = self
            .tipo
            .or(self.type_)
            .ok_or_else(|| MirrorError::Malformed(format!("row {id} has no type")))?;

        let amount = self
            .valor
            .or(self.amount)
            .ok_or_else(|| MirrorError::Malformed(format!("row {id} has no amount")))?;
        if amount.is_sign_negative() {
            return Err(MirrorError::Malformed(format!("row {id} has a negative amount")));
        }

        let raw_date = self
            .data
            .or(self.date)
            .ok_or_else(|| MirrorError::Malformed(format!("row {id} has no date")))?;
        let date = parse_remote_date(&raw_date)
            .ok_or_else(|| MirrorError::Malformed(format!("row {id} has bad date {raw_date}")))?;

        let description = self
            .descricao
            .or(self.description)
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        Ok(Transaction {
            id,
            txn_type,
            category: self.categoria.or(self.category).unwrap_or(Category::Other),
            description,
            amount,
            date,
        })
    }
}

/// Accepts a plain date or a timestamp whose first ten characters are one.
fn parse_remote_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| s.get(..10).and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()))
}
