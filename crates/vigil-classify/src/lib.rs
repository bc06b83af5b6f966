//! Event classification for the Vigil pipeline.
//!
//! This crate turns loosely-structured inbound events into decisions:
//!
//! - [`pattern`]: case-insensitive pattern-against-candidate matching
//! - [`classifier`]: assigns exactly one [`EventType`](vigil_types::EventType)
//!   to every event, degrading to `Unhandled`
//! - [`gate`]: decides whether a classified event warrants a notification

pub mod classifier;
pub mod gate;
pub mod pattern;

pub use classifier::classify;
pub use gate::should_alert;
