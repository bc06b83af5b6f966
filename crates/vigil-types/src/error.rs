//! Error types shared across all Vigil crates.

/// Errors that can occur across the Vigil pipeline.
///
/// Each variant corresponds to a different failure class: undecodable
/// transport payloads, configuration shape/pattern violations, formatter
/// failures on structurally absent fields, delivery failures, and the
/// dispatch-history store.
#[derive(Debug, thiserror::Error)]
pub enum VigilError {
    #[error("payload decode failed: {0}")]
    Decode(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("message formatting failed: {0}")]
    Format(String),

    #[error("notification sink error: {0}")]
    Sink(String),

    #[error("dispatch log error: {0}")]
    Store(String),
}
