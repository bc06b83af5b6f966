//! Log-delivery payload decoding.
//!
//! Subscription deliveries arrive as base64-encoded, gzip-compressed JSON
//! carrying a log group identifier and an ordered list of log lines.
//! Decode failure is fatal for the invocation: nothing downstream can run
//! without a decoded batch.

use std::io::Read;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use flate2::read::GzDecoder;
use serde::Deserialize;

use vigil_types::VigilError;

/// One log line within a decoded batch.
#[derive(Debug, Clone, Deserialize)]
pub struct LogLine {
    /// Milliseconds since the epoch.
    pub timestamp: i64,
    pub message: String,
}

/// Transport-agnostic representation of one delivered batch of log lines.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedBatch {
    #[serde(default)]
    pub message_type: Option<String>,
    pub log_group: String,
    #[serde(default)]
    pub log_events: Vec<LogLine>,
}

impl DecodedBatch {
    /// Subscription control messages carry no trail records and are skipped.
    pub fn is_control_message(&self) -> bool {
        self.message_type.as_deref() == Some("CONTROL_MESSAGE")
    }
}

/// Decode a base64+gzip subscription payload into a batch.
pub fn decode_subscription_payload(data: &str) -> Result<DecodedBatch, VigilError> {
    let compressed = STANDARD
        .decode(data.trim())
        .map_err(|e| VigilError::Decode(format!("payload is not valid base64: {e}")))?;

    let mut json = String::new();
    GzDecoder::new(compressed.as_slice())
        .read_to_string(&mut json)
        .map_err(|e| VigilError::Decode(format!("payload is not valid gzip: {e}")))?;

    serde_json::from_str(&json)
        .map_err(|e| VigilError::Decode(format!("decoded payload is not a log batch: {e}")))
}
