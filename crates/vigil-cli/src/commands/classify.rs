//! Classify an event without dispatching.

use std::path::Path;

use anyhow::{Context, Result};
use vigil_types::InboundEvent;

use crate::commands::read_input;

pub fn run(event_path: &Path) -> Result<()> {
    let input = read_input(event_path)?;
    let event = InboundEvent::from_json(&input).context("input is not a JSON event")?;

    let event_type = vigil_classify::classify(&event);
    let would_alert = vigil_classify::should_alert(event_type, &event, &[]);

    println!("type:        {event_type}");
    println!("would alert: {would_alert} (before exclusion patterns)");
    Ok(())
}
