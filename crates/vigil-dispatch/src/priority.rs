//! Default priority per event type.

use vigil_types::{EventType, Priority};

/// Resolve the delivery priority for a classified event.
///
/// A static table: each type is pinned to one default tier. Audit-trail
/// notifications carry their priority on the matched rule instead and never
/// go through this table.
pub fn resolve(event_type: EventType) -> Priority {
    match event_type {
        EventType::AlarmStateChange => Priority::High,
        EventType::EcsTaskStateChange => Priority::Medium,
        EventType::Ec2StateChange => Priority::Low,
        EventType::DevOpsInsight => Priority::Medium,
        EventType::CertificateExpiry => Priority::High,
        EventType::PipelineStateChange => Priority::Low,
        EventType::HealthEvent => Priority::Medium,
        EventType::InspectorFinding => Priority::Critical,
        EventType::DriftDetected => Priority::Low,
        EventType::SecurityHubFinding => Priority::Critical,
        EventType::OrgTrailForwarded => Priority::High,
        EventType::Unhandled => Priority::Low,
    }
}
