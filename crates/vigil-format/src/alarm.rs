//! CloudWatch alarm state change formatter.
//!
//! Handles both the direct event-bus shape (`detail.alarmName`,
//! `detail.state.value`) and the forwarded/aggregated shape (`AlarmName`,
//! `NewStateValue` at the top level).

use vigil_types::{InboundEvent, Message, VigilError};

use crate::UNKNOWN;

pub fn format(event: &InboundEvent, account_name: &str) -> Result<Message, VigilError> {
    let name = event
        .alarm_name()
        .ok_or_else(|| VigilError::Format("alarm event carries no alarm name".into()))?;

    let state = state_value(event, "/state/value", "NewStateValue");
    let previous = state_value(event, "/previousState/value", "OldStateValue");
    let reason = event
        .detail()
        .and_then(|d| d.pointer("/state/reason"))
        .or_else(|| event.raw().get("NewStateReason"))
        .and_then(|v| v.as_str())
        .unwrap_or(UNKNOWN);
    let region = event
        .raw()
        .get("region")
        .or_else(|| event.raw().get("Region"))
        .and_then(|v| v.as_str())
        .unwrap_or("eu-west-1");

    let header = if state == "ALARM" {
        format!("❗️ Alarm: {name}")
    } else if state == "OK" {
        format!("✅ Alarm resolved: {name}")
    } else {
        format!("Alarm update: {name}")
    };

    let message = Message::new()
        .header(header)
        .context("Account", account_name)
        .context("State", format!("{previous} → {state}"))
        .section(reason)
        .link(
            "Open alarm in console",
            format!(
                "https://{region}.console.aws.amazon.com/cloudwatch/home?region={region}#alarmsV2:alarm/{name}"
            ),
        );

    Ok(message)
}

/// Alarm state from the direct shape pointer, else the forwarded key.
fn state_value<'a>(event: &'a InboundEvent, pointer: &str, top_key: &str) -> &'a str {
    event
        .detail()
        .and_then(|d| d.pointer(pointer))
        .or_else(|| event.raw().get(top_key))
        .and_then(|v| v.as_str())
        .unwrap_or(UNKNOWN)
}
