//! Vigil: cloud account monitoring fan-in/fan-out pipeline.
//!
//! Umbrella crate re-exporting the workspace members so integration tests
//! and downstream consumers can depend on a single crate:
//!
//! - [`types`]: events, priorities, messages, rules, configuration
//! - [`classify`]: pattern matcher, classifier, and alert gate
//! - [`format`]: the message formatter registry
//! - [`dispatch`]: priority resolution, sinks, and orchestration
//! - [`trail`]: the organization audit-trail rule engine

pub use vigil_classify as classify;
pub use vigil_dispatch as dispatch;
pub use vigil_format as format;
pub use vigil_trail as trail;
pub use vigil_types as types;
