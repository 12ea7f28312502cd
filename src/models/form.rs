use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

use super::{Category, NewTransaction, TxnType};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum ValidationError {
    #[error("Please fill in all required fields: {0}")]
    Missing(&'static str),

    #[error("Unknown transaction type: {0} (use income or expense)")]
    InvalidType(String),

    #[error("Unknown category: {0}")]
    InvalidCategory(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Amount must be greater than zero")]
    NonPositiveAmount,

    #[error("Invalid date: {0} (expected YYYY-MM-DD)")]
    InvalidDate(String),
}

/// Raw user input for one transaction, as typed into the form or the CLI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct TransactionForm {
    pub(crate) txn_type: String,
    pub(crate) category: String,
    pub(crate) description: String,
    pub(crate) amount: String,
    pub(crate) date: String,
}

impl TransactionForm {
    /// Validate every field before anything is created. Either the whole
    /// transaction is valid or nothing is returned.
    pub(crate) fn validate(&self) -> Result<NewTransaction, ValidationError> {
        let txn_type = required(&self.txn_type, "type")?;
        let category = required(&self.category, "category")?;
        let amount = required(&self.amount, "amount")?;
        let date = required(&self.date, "date")?;

        let txn_type =
            TxnType::parse(txn_type).ok_or_else(|| ValidationError::InvalidType(txn_type.into()))?;
        let category = Category::parse(category)
            .ok_or_else(|| ValidationError::InvalidCategory(category.into()))?;
        let amount = parse_amount(amount)?;
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| ValidationError::InvalidDate(date.into()))?;

        let description = self.description.trim();
        let description = (!description.is_empty()).then(|| description.to_string());

        Ok(NewTransaction {
            txn_type,
            category,
            description,
            amount,
            date,
        })
    }
}

fn required<'a>(value: &'a str, field: &'static str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::Missing(field))
    } else {
        Ok(trimmed)
    }
}

/// Accepts `1234.5`, `1,234.50`, `R$ 50` and a decimal comma (`50,25`).
pub(crate) fn parse_amount(s: &str) -> Result<Decimal, ValidationError> {
    let cleaned: String = s
        .trim()
        .trim_start_matches("R$")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    // A lone comma followed by 1-2 digits is a decimal separator.
    let normalized = match cleaned.rsplit_once(',') {
        Some((int, frac)) if !cleaned.contains('.') && (1..=2).contains(&frac.len()) => {
            format!("{}.{frac}", int.replace(',', ""))
        }
        _ => cleaned.replace(',', ""),
    };

    let amount = Decimal::from_str(&normalized)
        .map_err(|_| ValidationError::InvalidAmount(s.trim().to_string()))?;
    if amount <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveAmount);
    }
    Ok(amount.round_dp(2))
}
