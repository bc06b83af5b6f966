//! Catch-all formatter for unrecognized events.
//!
//! Renders the raw event verbatim under a fixed header so operators can see
//! what arrived and decide whether it deserves a registered type. Never
//! fails: the whole point is visibility into events nothing else handles.

use vigil_types::{InboundEvent, Message};

pub fn format(event: &InboundEvent) -> Message {
    let raw = serde_json::to_string_pretty(event.raw())
        .unwrap_or_else(|_| event.raw().to_string());

    Message::new()
        .header("Unhandled event received")
        .section(raw)
}
