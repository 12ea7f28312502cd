mod config;
mod db;
mod ledger;
mod logging;
mod models;
mod remote;
mod run;
mod store;
mod ui;

use anyhow::{Context, Result};
use std::path::PathBuf;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let data_dir = get_data_dir()?;

    let tui = args.len() == 1;
    if tui {
        logging::init_file(&data_dir)?;
    } else {
        logging::init_stderr();
    }

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;

    let db = db::Database::open(&data_dir.join("rideledger.db"))?;
    let remote = config::RemoteConfig::load(&db)?;
    let store = store::LocalStore::load(db);
    let mut ledger = ledger::Ledger::open(store, remote.as_ref(), runtime.handle().clone());

    if tui {
        run::as_tui(&mut ledger, remote, &runtime)
    } else {
        run::as_cli(&args, &mut ledger, &runtime)
    }
}

fn get_data_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "rideledger", "RideLedger")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.to_path_buf())
}
