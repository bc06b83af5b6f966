//! Process an organization-trail log delivery payload.

use std::path::Path;

use anyhow::{Context, Result};
use vigil_dispatch::{Dispatcher, WebhookSink};
use vigil_trail::{decode_subscription_payload, RuleEngine};

use crate::commands::{load_config, read_input};

pub fn run(config_path: &Path, payload_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    let payload = read_input(payload_path)?;

    // Decode failure is fatal: without a batch there is nothing to evaluate.
    let batch = decode_subscription_payload(&payload).context("cannot decode payload")?;

    let sink = WebhookSink::new(config.sink_endpoints.clone())
        .context("failed to build webhook sink")?;
    let dispatcher = Dispatcher::new(config, sink);
    let engine = RuleEngine::new(&dispatcher);

    let summary = engine.handle_log_batch(&batch);
    println!(
        "processed {} line(s): {} dispatched, {} malformed, {} failed",
        summary.lines, summary.dispatched, summary.malformed, summary.failed
    );
    Ok(())
}
