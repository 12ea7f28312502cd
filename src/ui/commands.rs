use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::NaiveDate;

use super::app::{today, App, InputMode, PendingAction, Screen};
use crate::config::RemoteConfig;
use crate::ledger::Ledger;
use crate::models::TransactionForm;

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &mut Ledger) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit RideLedger", cmd_quit, r);
    register_command!("quit", "Quit RideLedger", cmd_quit, r);
    register_command!("l", "Go to Ledger", cmd_ledger, r);
    register_command!("ledger", "Go to Ledger", cmd_ledger, r);
    register_command!("n", "Open the new transaction form", cmd_new, r);
    register_command!("new", "Open the new transaction form", cmd_new, r);
    register_command!("r", "Go to Remote", cmd_remote, r);
    register_command!("remote", "Go to Remote", cmd_remote, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!(
        "add",
        "Add transaction (e.g. :add expense fuel 50 2024-01-10 Shell)",
        cmd_add,
        r
    );
    register_command!(
        "a",
        "Add transaction (e.g. :add expense fuel 50 2024-01-10 Shell)",
        cmd_add,
        r
    );
    register_command!("delete", "Delete selected transaction", cmd_delete, r);
    register_command!(
        "config",
        "Set remote mirror (e.g. :config https://x.supabase.co KEY)",
        cmd_config,
        r
    );
    register_command!(
        "disconnect",
        "Forget the remote mirror and run local only",
        cmd_disconnect,
        r
    );
    register_command!(
        "refresh",
        "Reload the ledger from the remote mirror",
        cmd_refresh,
        r
    );

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App, ledger: &mut Ledger) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if cmd_name.is_empty() {
        return Ok(());
    }

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        (cmd.run)(args, app, ledger)?;
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1) // skip single-letter aliases for suggestions
        .min_by_key(|k| levenshtein(input, k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Validate `form` and add it to the ledger. Validation problems are shown
/// in the status line and nothing is stored. Returns whether it was added.
pub(crate) fn submit(form: &TransactionForm, app: &mut App, ledger: &mut Ledger) -> anyhow::Result<bool> {
    let new = match form.validate() {
        Ok(new) => new,
        Err(e) => {
            app.set_status(e.to_string());
            return Ok(false);
        }
    };
    let txn = ledger.add(new)?;
    app.refresh(ledger);
    app.transaction_index = 0;
    app.transaction_scroll = 0;
    app.set_status(format!(
        "Added {} {} {}",
        txn.txn_type.as_str(),
        txn.category.label(),
        super::util::format_amount(txn.amount)
    ));
    ledger.flush_writes();
    Ok(true)
}

/// Parse `<type> <category> <amount> [YYYY-MM-DD] [description...]`.
pub(crate) fn parse_add_args(args: &str) -> TransactionForm {
    let mut tokens = args.split_whitespace();
    let txn_type = tokens.next().unwrap_or("").to_string();
    let category = tokens.next().unwrap_or("").to_string();
    let amount = tokens.next().unwrap_or("").to_string();

    let rest: Vec<&str> = tokens.collect();
    let (date, description) = match rest.split_first() {
        Some((first, tail)) if NaiveDate::parse_from_str(first, "%Y-%m-%d").is_ok() => {
            (first.to_string(), tail.join(" "))
        }
        _ => (today(), rest.join(" ")),
    };

    TransactionForm {
        txn_type,
        category,
        description,
        amount,
        date,
    }
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _ledger: &mut Ledger) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_ledger(_args: &str, app: &mut App, ledger: &mut Ledger) -> anyhow::Result<()> {
    app.screen = Screen::Ledger;
    app.refresh(ledger);
    Ok(())
}

fn cmd_new(_args: &str, app: &mut App, _ledger: &mut Ledger) -> anyhow::Result<()> {
    app.screen = Screen::New;
    Ok(())
}

fn cmd_remote(_args: &str, app: &mut App, _ledger: &mut Ledger) -> anyhow::Result<()> {
    app.screen = Screen::Remote;
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App, _ledger: &mut Ledger) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

fn cmd_add(args: &str, app: &mut App, ledger: &mut Ledger) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :add <income|expense> <category> <amount> [YYYY-MM-DD] [description]");
        return Ok(());
    }
    if submit(&parse_add_args(args), app, ledger)? {
        app.screen = Screen::Ledger;
    }
    Ok(())
}

fn cmd_delete(_args: &str, app: &mut App, _ledger: &mut Ledger) -> anyhow::Result<()> {
    if app.screen != Screen::Ledger || app.rows.is_empty() {
        app.set_status("Go to the Ledger and select a transaction first");
        return Ok(());
    }

    if let Some(row) = app.selected_row() {
        let label = format!("{} {} on {}", row.category, row.amount, row.date);
        let id = row.id;
        app.confirm_message = format!("Delete {label}?");
        app.pending_action = Some(PendingAction::DeleteTransaction { id, label });
        app.input_mode = InputMode::Confirm;
    }

    Ok(())
}

fn cmd_config(args: &str, app: &mut App, ledger: &mut Ledger) -> anyhow::Result<()> {
    let mut parts = args.split_whitespace();
    let endpoint = parts.next().unwrap_or("");
    let key = parts.next().unwrap_or("");

    let config = match RemoteConfig::new(endpoint, key) {
        Ok(config) => config,
        Err(e) => {
            app.set_status(e.to_string());
            return Ok(());
        }
    };

    config.save(ledger.store_mut().db_mut())?;
    if ledger.connect(&config) {
        app.hydration = ledger.begin_hydration();
        app.set_status("Remote saved, loading ledger from the mirror…");
    } else {
        app.set_status("Remote saved but the client could not be created; running local only");
    }
    app.remote = Some(config);
    app.screen = Screen::Remote;
    Ok(())
}

fn cmd_disconnect(_args: &str, app: &mut App, ledger: &mut Ledger) -> anyhow::Result<()> {
    RemoteConfig::clear(ledger.store().db())?;
    ledger.detach();
    app.remote = None;
    app.hydration = None;
    app.source = None;
    app.set_status("Remote mirror removed, running local only");
    Ok(())
}

fn cmd_refresh(_args: &str, app: &mut App, ledger: &mut Ledger) -> anyhow::Result<()> {
    if !ledger.is_mirrored() {
        app.set_status("No remote mirror configured. Use :config <endpoint> <key>");
        return Ok(());
    }
    app.hydration = ledger.begin_hydration();
    app.set_status("Loading ledger from the mirror…");
    Ok(())
}
