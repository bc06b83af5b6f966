//! CLI command implementations.

pub mod classify;
pub mod config;
pub mod dispatch;
pub mod history;
pub mod trail;

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use vigil_types::MonitoringConfig;

/// Read a file argument, with `-` meaning stdin.
pub fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read from stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))
    }
}

/// Load and validate the monitoring configuration.
pub fn load_config(path: &Path) -> Result<MonitoringConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    MonitoringConfig::from_toml(&content)
        .with_context(|| format!("invalid configuration in {}", path.display()))
}
