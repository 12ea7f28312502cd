pub(crate) mod form;
pub(crate) mod ledger;
pub(crate) mod remote;
