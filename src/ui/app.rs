use chrono::Local;

use crate::config::RemoteConfig;
use crate::ledger::{Hydration, Ledger, Source};
use crate::models::{Category, Totals, TransactionForm, TxnType};

use super::util::clamp_cursor;
use super::view::{self, DisplayRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Ledger,
    New,
    Remote,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[Self::Ledger, Self::New, Self::Remote]
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ledger => write!(f, "Ledger"),
            Self::New => write!(f, "New"),
            Self::Remote => write!(f, "Remote"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Editing,
    Confirm,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Editing => write!(f, "EDIT"),
            Self::Confirm => write!(f, "CONFIRM"),
        }
    }
}

/// Pending action that requires user confirmation.
#[derive(Debug, Clone)]
pub(crate) enum PendingAction {
    DeleteTransaction { id: i64, label: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FormField {
    Type,
    Category,
    Description,
    Amount,
    Date,
    Submit,
}

impl FormField {
    pub(crate) fn all() -> &'static [FormField] {
        &[
            Self::Type,
            Self::Category,
            Self::Description,
            Self::Amount,
            Self::Date,
            Self::Submit,
        ]
    }

    pub(crate) fn label(&self) -> &'static str {
        match self {
            Self::Type => "Type",
            Self::Category => "Category",
            Self::Description => "Description",
            Self::Amount => "Amount",
            Self::Date => "Date",
            Self::Submit => "[ Add transaction ]",
        }
    }

    /// Fields edited as free text rather than cycled.
    pub(crate) fn is_text(&self) -> bool {
        matches!(self, Self::Description | Self::Amount | Self::Date)
    }
}

/// The new-transaction form.
#[derive(Debug, Clone)]
pub(crate) struct FormState {
    pub(crate) txn_type: TxnType,
    pub(crate) category: Category,
    pub(crate) description: String,
    pub(crate) amount: String,
    pub(crate) date: String,
    pub(crate) field_index: usize,
}

impl FormState {
    pub(crate) fn new() -> Self {
        Self {
            txn_type: TxnType::Income,
            category: Category::Ride,
            description: String::new(),
            amount: String::new(),
            date: today(),
            field_index: 0,
        }
    }

    /// Clear the entries and put the date back to today.
    pub(crate) fn reset(&mut self) {
        *self = Self::new();
    }

    pub(crate) fn field(&self) -> FormField {
        FormField::all()[self.field_index.min(FormField::all().len() - 1)]
    }

    pub(crate) fn value(&self, field: FormField) -> String {
        match field {
            FormField::Type => self.txn_type.to_string(),
            FormField::Category => self.category.label().to_string(),
            FormField::Description => self.description.clone(),
            FormField::Amount => self.amount.clone(),
            FormField::Date => self.date.clone(),
            FormField::Submit => String::new(),
        }
    }

    pub(crate) fn set_text(&mut self, field: FormField, value: String) {
        match field {
            FormField::Description => self.description = value,
            FormField::Amount => self.amount = value,
            FormField::Date => self.date = value,
            _ => {}
        }
    }

    /// Step a cycled field (type or category) by `delta`.
    pub(crate) fn adjust(&mut self, delta: i32) {
        match self.field() {
            FormField::Type => self.txn_type = self.txn_type.toggle(),
            FormField::Category => self.category = self.category.cycle(delta),
            _ => {}
        }
    }

    pub(crate) fn to_form(&self) -> TransactionForm {
        TransactionForm {
            txn_type: self.txn_type.as_str().to_string(),
            category: self.category.as_str().to_string(),
            description: self.description.clone(),
            amount: self.amount.clone(),
            date: self.date.clone(),
        }
    }
}

pub(crate) fn today() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,

    // Ledger
    pub(crate) rows: Vec<DisplayRow>,
    pub(crate) totals: Totals,
    pub(crate) transaction_index: usize,
    pub(crate) transaction_scroll: usize,

    // New transaction
    pub(crate) form: FormState,

    // Remote
    pub(crate) remote: Option<RemoteConfig>,
    pub(crate) source: Option<Source>,
    pub(crate) hydration: Option<Hydration>,
    pub(crate) pending_writes: usize,

    // Confirmation
    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new(remote: Option<RemoteConfig>) -> Self {
        Self {
            running: true,
            screen: Screen::Ledger,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            status_message: String::new(),
            show_help: false,

            rows: Vec::new(),
            totals: Totals::default(),
            transaction_index: 0,
            transaction_scroll: 0,

            form: FormState::new(),

            remote,
            source: None,
            hydration: None,
            pending_writes: 0,

            pending_action: None,
            confirm_message: String::new(),

            visible_rows: 20,
        }
    }

    /// Re-project the ledger. Called after every mutation and hydration.
    pub(crate) fn refresh(&mut self, ledger: &Ledger) {
        self.rows = view::project(ledger.transactions());
        self.totals = ledger.totals();
        self.pending_writes = ledger.pending_writes();
        clamp_cursor(
            &mut self.transaction_index,
            &mut self.transaction_scroll,
            self.rows.len(),
        );
    }

    pub(crate) fn selected_row(&self) -> Option<&DisplayRow> {
        self.rows.get(self.transaction_index)
    }

    pub(crate) fn is_syncing(&self) -> bool {
        self.hydration.is_some()
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }
}
