//! Delivery priority tiers.
//!
//! [`Priority`] selects the delivery channel a notification is routed to.
//! The ticketing sink only distinguishes three severities, so
//! [`TicketSeverity`] exists as a lossy projection of the same concept,
//! not as a separate type.

use serde::{Deserialize, Serialize};

/// Ordered delivery priority for a notification.
///
/// Higher priorities route to more urgent channels. Every dispatched
/// message carries exactly one priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    /// Stable lowercase name, used for endpoint lookup and log output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Critical => "critical",
        }
    }

    /// Project onto the narrower three-tier ticket severity scale.
    ///
    /// `Medium` and `High` both collapse to `Avg`/`High` boundaries the
    /// ticketing system understands; `Critical` maps to `High`.
    pub fn ticket_severity(&self) -> TicketSeverity {
        match self {
            Priority::Low => TicketSeverity::Low,
            Priority::Medium => TicketSeverity::Avg,
            Priority::High | Priority::Critical => TicketSeverity::High,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Three-tier severity understood by the ticketing sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketSeverity {
    Low,
    Avg,
    High,
}
