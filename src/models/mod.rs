mod category;
mod form;
mod transaction;

pub(crate) use category::Category;
pub(crate) use form::TransactionForm;
pub(crate) use transaction::{NewTransaction, Totals, Transaction, TxnType};
