//! Message formatter registry.
//!
//! One formatter per [`EventType`], dispatched through an exhaustive match
//! so the registry is total over the type set by construction. Formatters
//! are pure: they read type-specific fields from the event plus the resolved
//! account name and deterministically produce a [`Message`]. A missing or
//! malformed subfield renders as a placeholder rather than aborting the
//! whole message; only a structurally required field being entirely absent
//! returns an error, which the dispatcher catches.

mod alarm;
mod forwarded;
mod health;
mod insight;
mod pipeline;
mod security;
mod state;
mod unhandled;

use vigil_types::{EventType, InboundEvent, Message, VigilError};

/// Placeholder rendered when an optional event field is absent.
pub(crate) const UNKNOWN: &str = "(unknown)";

/// Build the notification message for a classified event.
pub fn format(
    event_type: EventType,
    event: &InboundEvent,
    account_name: &str,
) -> Result<Message, VigilError> {
    match event_type {
        EventType::AlarmStateChange => alarm::format(event, account_name),
        EventType::EcsTaskStateChange => Ok(state::format_ecs(event, account_name)),
        EventType::Ec2StateChange => Ok(state::format_ec2(event, account_name)),
        EventType::DevOpsInsight => Ok(insight::format_devops(event, account_name)),
        EventType::CertificateExpiry => Ok(insight::format_certificate(event, account_name)),
        EventType::PipelineStateChange => Ok(pipeline::format(event, account_name)),
        EventType::HealthEvent => Ok(health::format(event, account_name)),
        EventType::InspectorFinding => Ok(security::format_inspector(event, account_name)),
        EventType::DriftDetected => Ok(security::format_drift(event, account_name)),
        EventType::SecurityHubFinding => Ok(security::format_security_hub(event, account_name)),
        EventType::OrgTrailForwarded => Ok(forwarded::format(event, account_name)),
        EventType::Unhandled => Ok(unhandled::format(event)),
    }
}

/// String at a JSON pointer inside the event's `detail`, or [`UNKNOWN`].
pub(crate) fn detail_at<'a>(event: &'a InboundEvent, pointer: &str) -> &'a str {
    event
        .detail()
        .and_then(|d| d.pointer(pointer))
        .and_then(|v| v.as_str())
        .unwrap_or(UNKNOWN)
}

/// Top-level string field, or [`UNKNOWN`].
pub(crate) fn top_str<'a>(event: &'a InboundEvent, key: &str) -> &'a str {
    event.raw().get(key).and_then(|v| v.as_str()).unwrap_or(UNKNOWN)
}
