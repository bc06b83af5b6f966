//! Dispatch one or more events through the full pipeline.

use std::path::Path;

use anyhow::{Context, Result};
use vigil_dispatch::{DispatchOutcome, Dispatcher, WebhookSink};
use vigil_types::InboundEvent;

use crate::commands::{load_config, read_input};

pub fn run(config_path: &Path, event_path: &Path, batch: bool) -> Result<()> {
    let config = load_config(config_path)?;
    let input = read_input(event_path)?;

    let events: Vec<InboundEvent> = if batch {
        let values: Vec<serde_json::Value> =
            serde_json::from_str(&input).context("input is not a JSON array of events")?;
        values.into_iter().map(InboundEvent::new).collect()
    } else {
        vec![InboundEvent::from_json(&input).context("input is not a JSON event")?]
    };

    let sink = WebhookSink::new(config.sink_endpoints.clone())
        .context("failed to build webhook sink")?;
    let dispatcher = Dispatcher::new(config, sink);

    let outcomes = dispatcher.dispatch_batch(events.iter());
    for (i, outcome) in outcomes.iter().enumerate() {
        match outcome {
            DispatchOutcome::Sent(event_type, priority) => {
                println!("[{i}] sent: {event_type} at {priority}");
            }
            DispatchOutcome::Suppressed(event_type) => {
                println!("[{i}] suppressed: {event_type}");
            }
            DispatchOutcome::Failed(event_type) => {
                println!("[{i}] FAILED: {event_type} (see logs)");
            }
        }
    }
    Ok(())
}
