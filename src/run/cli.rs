use anyhow::{Context, Result};
use tokio::runtime::Runtime;

use crate::config::RemoteConfig;
use crate::ledger::{Ledger, Source};
use crate::models::{Category, TransactionForm};
use crate::ui::util::{format_amount, format_date, format_signed, truncate};

pub(crate) fn as_cli(args: &[String], ledger: &mut Ledger, runtime: &Runtime) -> Result<()> {
    match args[1].as_str() {
        "add" | "a" => with_ledger(ledger, runtime, |l| cli_add(&args[2..], l)),
        "list" | "ls" => with_ledger(ledger, runtime, cli_list),
        "delete" | "rm" => with_ledger(ledger, runtime, |l| cli_delete(&args[2..], l)),
        "summary" | "s" => with_ledger(ledger, runtime, cli_summary),
        "config" => cli_config(&args[2..], ledger),
        "categories" => {
            cli_categories();
            Ok(())
        }
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("rideledger {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("RideLedger - income and expense ledger for ride-share drivers");
    println!();
    println!("Usage: rideledger [command]");
    println!();
    println!("Commands:");
    println!("  (none)                        Launch interactive TUI");
    println!("  add <income|expense> <category> <amount>");
    println!("    --date <YYYY-MM-DD>         Transaction date (default: today)");
    println!("    --desc <text>               Optional description");
    println!("  list                          List transactions, newest first");
    println!("  delete <id>                   Delete a transaction");
    println!("  summary                       Print balance, income and expenses");
    println!("  config set <endpoint> <key>   Mirror the ledger to a remote table");
    println!("  config show                   Show the remote mirror settings");
    println!("  config clear                  Forget the remote mirror");
    println!("  categories                    List the known categories");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
}

/// Hydrate from the mirror, run `action`, then send and wait for its mirror
/// writes. The action prints its result before any write goes out.
fn with_ledger<F>(ledger: &mut Ledger, runtime: &Runtime, action: F) -> Result<()>
where
    F: FnOnce(&mut Ledger) -> Result<()>,
{
    if ledger.is_mirrored() && runtime.block_on(ledger.hydrate()) == Source::Local {
        eprintln!("Warning: remote mirror unavailable, using the local ledger");
    }

    let result = action(ledger);
    ledger.flush_writes();
    runtime.block_on(ledger.settle());
    result
}

fn flag<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == name)
        .map(|w| w[1].as_str())
}

fn cli_add(args: &[String], ledger: &mut Ledger) -> Result<()> {
    let positional: Vec<&str> = args
        .iter()
        .scan(false, |skip, a| {
            let keep = !*skip && !a.starts_with("--");
            *skip = a.starts_with("--");
            Some((keep, a.as_str()))
        })
        .filter_map(|(keep, a)| keep.then_some(a))
        .collect();

    if positional.len() < 3 {
        anyhow::bail!(
            "Usage: rideledger add <income|expense> <category> <amount> [--date YYYY-MM-DD] [--desc TEXT]"
        );
    }

    let form = TransactionForm {
        txn_type: positional[0].to_string(),
        category: positional[1].to_string(),
        amount: positional[2].to_string(),
        description: flag(args, "--desc").unwrap_or_default().to_string(),
        date: flag(args, "--date")
            .map(str::to_string)
            .unwrap_or_else(crate::ui::app::today),
    };

    let new = form.validate()?;
    let txn = ledger.add(new)?;
    println!(
        "Added #{} {} {} {} on {}",
        txn.id,
        txn.txn_type,
        txn.category,
        format_amount(txn.amount),
        format_date(txn.date)
    );
    Ok(())
}

fn cli_list(ledger: &mut Ledger) -> Result<()> {
    let txns = ledger.transactions();
    if txns.is_empty() {
        println!("No transactions");
        return Ok(());
    }

    println!(
        "{:<14} {:<11} {:<12} {:<30} {:>16}",
        "ID", "Date", "Category", "Description", "Amount"
    );
    println!("{}", "─".repeat(87));
    for txn in txns {
        println!(
            "{:<14} {:<11} {:<12} {:<30} {:>16}",
            txn.id,
            format_date(txn.date),
            txn.category.label(),
            truncate(txn.description_or_placeholder(), 30),
            format_signed(txn.amount, txn.is_income()),
        );
    }
    Ok(())
}

fn cli_delete(args: &[String], ledger: &mut Ledger) -> Result<()> {
    let raw = args
        .first()
        .ok_or_else(|| anyhow::anyhow!("Usage: rideledger delete <id>"))?;
    let id: i64 = raw
        .parse()
        .with_context(|| format!("Invalid transaction id: {raw}"))?;

    if ledger.remove(id)? {
        println!("Deleted transaction #{id}");
    } else {
        println!("No transaction #{id}");
    }
    Ok(())
}

fn cli_summary(ledger: &mut Ledger) -> Result<()> {
    let totals = ledger.totals();

    println!("RideLedger");
    println!("{}", "─".repeat(40));
    println!("  Balance:    {}", format_amount(totals.balance));
    println!("  Income:     {}", format_amount(totals.income));
    println!("  Expenses:   {}", format_amount(totals.expense));
    println!("  Total Txns: {}", ledger.transactions().len());
    Ok(())
}

fn cli_config(args: &[String], ledger: &mut Ledger) -> Result<()> {
    match args.first().map(String::as_str) {
        Some("set") => {
            let (Some(endpoint), Some(key)) = (args.get(1), args.get(2)) else {
                anyhow::bail!("Usage: rideledger config set <endpoint> <key>");
            };
            let config = RemoteConfig::new(endpoint, key)?;
            config.save(ledger.store_mut().db_mut())?;
            println!("Remote mirror set to {}", config.endpoint);
        }
        Some("show") | None => match RemoteConfig::load(ledger.store().db())? {
            Some(config) => {
                println!("Endpoint: {}", config.endpoint);
                println!("Key:      {}", config.masked_key());
            }
            None => println!("No remote mirror configured (local only)"),
        },
        Some("clear") => {
            RemoteConfig::clear(ledger.store().db())?;
            println!("Remote mirror removed");
        }
        Some(other) => anyhow::bail!("Unknown config command: {other} (use set, show or clear)"),
    }
    Ok(())
}

fn cli_categories() {
    for category in Category::all() {
        println!("  {:<12} {}", category.as_str(), category.label());
    }
}
