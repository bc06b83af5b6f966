//! Event type classification.
//!
//! Events arrive over two transports with different shapes: direct
//! structured delivery (with a `detail-type` field) and forwarded or
//! aggregated notifications that only carry a free-text subject. The
//! classifier degrades through a fallback chain rather than erroring, so
//! every event ends up with exactly one [`EventType`].

use vigil_types::{EventType, InboundEvent};

use crate::pattern;

/// Subject infix marking a forwarded organization-trail notification.
const ORG_TRAIL_SUBJECT_INFIX: &str = "org trail";

/// Assign an event type to a decoded event. First match wins:
///
/// 1. exact `detail-type` match against a registered label,
/// 2. registered label matched against the free-text subject,
/// 3. org-trail infix in the subject,
/// 4. bare alarm-name shape (forwarded/aggregated alarms),
/// 5. [`EventType::Unhandled`].
pub fn classify(event: &InboundEvent) -> EventType {
    if let Some(detail_type) = event.detail_type() {
        if let Some(t) = EventType::ALL.iter().find(|t| t.label() == detail_type) {
            return *t;
        }
    }

    if let Some(subject) = event.subject() {
        // Labels act as patterns, the subject is the literal candidate.
        let labels: Vec<String> = EventType::ALL.iter().map(|t| t.label().to_string()).collect();
        if let Some(hit) = pattern::matching_pattern(&labels, subject) {
            if let Some(t) = EventType::ALL.iter().find(|t| t.label() == hit) {
                return *t;
            }
        }

        if subject.to_lowercase().contains(ORG_TRAIL_SUBJECT_INFIX) {
            return EventType::OrgTrailForwarded;
        }
    }

    if event.alarm_name().is_some() {
        return EventType::AlarmStateChange;
    }

    EventType::Unhandled
}
