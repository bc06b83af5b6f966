//! Inbound events and the closed event type registry.
//!
//! [`InboundEvent`] wraps the loosely-structured JSON tree delivered by the
//! transport and exposes typed accessors for the handful of fields the
//! classifier and formatters consult. [`EventType`] is the closed set of
//! symbolic tags classification can assign; exhaustive `match` over it gives
//! compile-time totality for the gate, formatter, and priority tables.

use serde_json::Value;

/// Symbolic classification tag for an inbound monitoring event.
///
/// Classification always yields exactly one tag, defaulting to
/// [`EventType::Unhandled`]. Every tag has exactly one formatter and one
/// default priority, enforced by exhaustive matches in `vigil-format` and
/// `vigil-dispatch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    AlarmStateChange,
    EcsTaskStateChange,
    Ec2StateChange,
    DevOpsInsight,
    CertificateExpiry,
    PipelineStateChange,
    HealthEvent,
    InspectorFinding,
    DriftDetected,
    SecurityHubFinding,
    OrgTrailForwarded,
    Unhandled,
}

impl EventType {
    /// Every registered type, in classification-preference order.
    ///
    /// `Unhandled` is deliberately absent: it is the fallback, never a
    /// label to match against.
    pub const ALL: &'static [EventType] = &[
        EventType::AlarmStateChange,
        EventType::EcsTaskStateChange,
        EventType::Ec2StateChange,
        EventType::DevOpsInsight,
        EventType::CertificateExpiry,
        EventType::PipelineStateChange,
        EventType::HealthEvent,
        EventType::InspectorFinding,
        EventType::DriftDetected,
        EventType::SecurityHubFinding,
        EventType::OrgTrailForwarded,
    ];

    /// The wire `detail-type` label this type matches, as emitted by the
    /// upstream event bus.
    pub fn label(&self) -> &'static str {
        match self {
            EventType::AlarmStateChange => "CloudWatch Alarm State Change",
            EventType::EcsTaskStateChange => "ECS Task State Change",
            EventType::Ec2StateChange => "EC2 Instance State-change Notification",
            EventType::DevOpsInsight => "DevOps Guru New Insight Open",
            EventType::CertificateExpiry => "ACM Certificate Approaching Expiration",
            EventType::PipelineStateChange => "CodePipeline Pipeline Execution State Change",
            EventType::HealthEvent => "AWS Health Event",
            EventType::InspectorFinding => "Inspector2 Finding",
            EventType::DriftDetected => "CloudFormation Drift Detection Status Change",
            EventType::SecurityHubFinding => "Security Hub Findings - Imported",
            EventType::OrgTrailForwarded => "Org Trail Monitoring Event",
            EventType::Unhandled => "Unhandled Event",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// An opaque structured event as delivered by the transport.
///
/// No fixed schema is assumed; accessors return `None` for anything absent
/// or of the wrong shape. Transient, never persisted.
#[derive(Debug, Clone)]
pub struct InboundEvent(Value);

impl InboundEvent {
    pub fn new(value: Value) -> Self {
        InboundEvent(value)
    }

    /// Parse an event from raw JSON text.
    pub fn from_json(text: &str) -> Result<Self, crate::VigilError> {
        serde_json::from_str(text)
            .map(InboundEvent)
            .map_err(|e| crate::VigilError::Decode(format!("invalid event JSON: {e}")))
    }

    /// The raw JSON tree.
    pub fn raw(&self) -> &Value {
        &self.0
    }

    /// The structured `detail-type` field set by the event bus, if any.
    pub fn detail_type(&self) -> Option<&str> {
        self.0.get("detail-type").and_then(Value::as_str)
    }

    /// The `detail` subtree carrying the type-specific event body.
    pub fn detail(&self) -> Option<&Value> {
        self.0.get("detail")
    }

    /// Free-text subject line, present on forwarded/aggregated notifications
    /// that lack a structured `detail-type`.
    pub fn subject(&self) -> Option<&str> {
        self.0
            .get("subject")
            .or_else(|| self.0.get("Subject"))
            .and_then(Value::as_str)
    }

    /// The originating account id, if the event carries one.
    pub fn account_id(&self) -> Option<&str> {
        self.0
            .get("account")
            .or_else(|| self.0.get("AWSAccountId"))
            .and_then(Value::as_str)
    }

    /// Alarm name, whether nested under `detail` (direct delivery) or at the
    /// top level (forwarded/aggregated alarm shape).
    pub fn alarm_name(&self) -> Option<&str> {
        self.detail()
            .and_then(|d| d.get("alarmName"))
            .or_else(|| self.0.get("AlarmName"))
            .and_then(Value::as_str)
    }

    /// String field lookup inside `detail`, tolerating absence at any level.
    pub fn detail_str(&self, key: &str) -> Option<&str> {
        self.detail().and_then(|d| d.get(key)).and_then(Value::as_str)
    }
}

impl From<Value> for InboundEvent {
    fn from(value: Value) -> Self {
        InboundEvent(value)
    }
}
