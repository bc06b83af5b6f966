//! Core types shared across all Vigil crates.
//!
//! Defines inbound events, the event type registry, priorities, structured
//! messages, monitoring rules, configuration, and error types used by the
//! classifier, formatter registry, dispatcher, and audit-trail rule engine.

pub mod config;
pub mod error;
pub mod event;
pub mod message;
pub mod priority;

pub use config::{
    AccountConfiguration, MonitoringConfig, MonitoringRule, RuleMatcher, RulePriority,
};
pub use error::VigilError;
pub use event::{EventType, InboundEvent};
pub use message::{ActionButton, Link, Message, MAX_HEADER_LEN, MAX_SECTION_LEN};
pub use priority::{Priority, TicketSeverity};
