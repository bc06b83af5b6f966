//! Configuration validation.

use std::path::Path;

use anyhow::Result;

use crate::commands::load_config;

pub fn validate(path: &Path) -> Result<()> {
    let config = load_config(path)?;

    let account_rules: usize = config.accounts.iter().map(|a| a.rules.len()).sum();
    println!("configuration OK");
    println!("  accounts:           {}", config.accounts.len());
    println!("  account rules:      {account_rules}");
    println!("  global rules:       {}", config.global_rules.len());
    println!("  exclusion patterns: {}", config.excluded_alarm_patterns.len());
    println!("  sink endpoints:     {}", config.sink_endpoints.len());
    Ok(())
}
