//! Alert gating: does a classified event warrant a notification at all?

use tracing::debug;
use vigil_types::{EventType, InboundEvent};

use crate::pattern;

/// Alarm state considered actionable.
const ALARM_STATE: &str = "ALARM";

/// Decide whether a classified event should produce a human notification.
///
/// Defaults to `true` per type. `AlarmStateChange` is suppressed when the
/// alarm name matches an exclusion pattern, and otherwise alerts only when
/// the transition touches the `ALARM` state on either side (so
/// `INSUFFICIENT_DATA -> OK` style transitions stay silent). `Unhandled`
/// never auto-alerts: unrecognized events are renderable for visibility but
/// only when dispatched manually.
pub fn should_alert(
    event_type: EventType,
    event: &InboundEvent,
    excluded_alarm_patterns: &[String],
) -> bool {
    match event_type {
        EventType::AlarmStateChange => {
            if let Some(name) = event.alarm_name() {
                if pattern::matches(excluded_alarm_patterns, name) {
                    debug!(alarm = name, "alarm excluded by pattern, suppressing");
                    return false;
                }
            }
            let state = alarm_state(event);
            let previous = previous_alarm_state(event);
            state.as_deref() == Some(ALARM_STATE) || previous.as_deref() == Some(ALARM_STATE)
        }
        EventType::Unhandled => false,
        _ => true,
    }
}

/// Current alarm state, from either the direct or the forwarded shape.
fn alarm_state(event: &InboundEvent) -> Option<String> {
    event
        .detail()
        .and_then(|d| d.pointer("/state/value"))
        .or_else(|| event.raw().get("NewStateValue"))
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

/// Previous alarm state, same shape tolerance as [`alarm_state`].
fn previous_alarm_state(event: &InboundEvent) -> Option<String> {
    event
        .detail()
        .and_then(|d| d.pointer("/previousState/value"))
        .or_else(|| event.raw().get("OldStateValue"))
        .and_then(|v| v.as_str())
        .map(str::to_string)
}
