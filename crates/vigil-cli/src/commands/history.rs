//! Show recent dispatch history from the SQLite log.

use std::path::Path;

use anyhow::{bail, Context, Result};
use rusqlite::Connection;
use vigil_dispatch::log;

use crate::commands::load_config;

pub fn run(config_path: &Path, limit: u32) -> Result<()> {
    let config = load_config(config_path)?;
    let Some(db_path) = config.dispatch_log_path else {
        bail!("no dispatch_log_path configured; history is disabled");
    };

    let conn = Connection::open(&db_path)
        .with_context(|| format!("cannot open dispatch log at {}", db_path.display()))?;
    log::init_table(&conn)?;

    let entries = log::recent(&conn, limit)?;
    if entries.is_empty() {
        println!("No dispatches recorded yet.");
        return Ok(());
    }

    for entry in &entries {
        let status = if entry.success { "ok" } else { "FAIL" };
        let header = entry.header.as_deref().unwrap_or("(no header)");
        println!(
            "{}  [{status:4}] {:8} {:40} {}",
            entry.fired_at, entry.priority, entry.event_type, header
        );
        if let Some(error) = &entry.error {
            println!("             error: {error}");
        }
    }
    println!("{} entry(ies).", entries.len());
    Ok(())
}
