//! Notification sinks.
//!
//! [`NotificationSink`] is the seam between the pipeline and the delivery
//! transport. [`WebhookSink`] is the production implementation: it resolves
//! the priority to a configured endpoint URL and POSTs the rendered wire
//! payload as JSON. HTTP runs on a current-thread tokio runtime owned by
//! the sink, so callers stay synchronous.

use std::collections::HashMap;
use std::time::Duration;

use serde::Serialize;
use tracing::debug;
use vigil_types::{Link, Message, Priority, VigilError};

/// External delivery endpoint consumed by the dispatcher.
///
/// Implementations must map a send failure to [`VigilError::Sink`]; the
/// dispatcher catches it, the sink must not panic.
pub trait NotificationSink {
    fn send(&self, message: &Message, priority: Priority) -> Result<(), VigilError>;
}

/// Wire payload POSTed to webhook endpoints.
///
/// Self-describing (version field) with the message already rendered:
/// header truncated, sections placeholder-substituted.
#[derive(Debug, Serialize)]
pub struct WirePayload {
    pub version: &'static str,
    pub priority: Priority,
    pub header: Option<String>,
    pub context: Vec<(String, String)>,
    pub sections: Vec<String>,
    pub link: Option<Link>,
    /// Base64 action payloads, passed through verbatim.
    pub actions: Vec<(String, String)>,
    /// Pre-formatted plain-text fallback for sinks without rich rendering.
    pub text: String,
}

impl WirePayload {
    pub fn render(message: &Message, priority: Priority) -> Self {
        WirePayload {
            version: "1",
            priority,
            header: message.rendered_header(),
            context: message.context.clone(),
            sections: message.rendered_sections(),
            link: message.link.clone(),
            actions: message
                .actions
                .iter()
                .map(|b| (b.label.clone(), b.payload.clone()))
                .collect(),
            text: message.to_plain_text(),
        }
    }
}

/// Production sink: per-priority webhook endpoints.
pub struct WebhookSink {
    endpoints: HashMap<Priority, String>,
    client: reqwest::Client,
    runtime: tokio::runtime::Runtime,
}

impl WebhookSink {
    /// Build a sink from the configured priority -> endpoint URL table.
    pub fn new(endpoints: HashMap<Priority, String>) -> Result<Self, VigilError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| VigilError::Sink(format!("failed to create runtime: {e}")))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| VigilError::Sink(format!("failed to build HTTP client: {e}")))?;

        Ok(WebhookSink {
            endpoints,
            client,
            runtime,
        })
    }

    fn endpoint(&self, priority: Priority) -> Result<&str, VigilError> {
        self.endpoints
            .get(&priority)
            .map(String::as_str)
            .ok_or_else(|| {
                VigilError::Sink(format!("no endpoint configured for priority {priority}"))
            })
    }
}

impl NotificationSink for WebhookSink {
    fn send(&self, message: &Message, priority: Priority) -> Result<(), VigilError> {
        let url = self.endpoint(priority)?;
        let payload = WirePayload::render(message, priority);

        debug!(%priority, url, "sending notification");
        let response = self
            .runtime
            .block_on(
                self.client
                    .post(url)
                    .header("Content-Type", "application/json")
                    .header("User-Agent", "vigil-dispatch/0.1")
                    .json(&payload)
                    .send(),
            )
            .map_err(|e| VigilError::Sink(format!("webhook POST failed: {e}")))?;

        if !response.status().is_success() {
            return Err(VigilError::Sink(format!(
                "webhook returned HTTP {}",
                response.status().as_u16()
            )));
        }
        Ok(())
    }
}
