//! Formatter for forwarded organization-trail notifications.
//!
//! These arrive with a free-text subject and a plain message body, produced
//! by a sibling deployment's trail engine and fanned in over the shared
//! topic. They are rendered as-is: the originating engine already did the
//! formatting work.

use vigil_types::{InboundEvent, Message};

use crate::{top_str, UNKNOWN};

pub fn format(event: &InboundEvent, account_name: &str) -> Message {
    let subject = event.subject().unwrap_or("Org trail monitoring event");
    let body = event
        .raw()
        .get("Message")
        .or_else(|| event.raw().get("message"))
        .and_then(|v| v.as_str())
        .unwrap_or(UNKNOWN);

    let mut message = Message::new()
        .header(subject)
        .context("Account", account_name)
        .section(body);

    let source_account = top_str(event, "AWSAccountId");
    if source_account != UNKNOWN {
        message = message.context("Source account", source_account);
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn forwarded_notification_passes_through() {
        let event = InboundEvent::new(json!({
            "Subject": "Org Trail: key usage in 111122223333",
            "Message": "Deployment key arn:aws:kms:... used by admin",
            "AWSAccountId": "111122223333"
        }));
        let msg = format(&event, "workload-prod");
        assert_eq!(msg.header.as_deref(), Some("Org Trail: key usage in 111122223333"));
        assert!(msg.sections[0].contains("Deployment key"));
        assert!(msg.context.contains(&("Source account".into(), "111122223333".into())));
    }

    #[test]
    fn missing_body_renders_placeholder() {
        let msg = format(&InboundEvent::new(json!({})), "acct");
        assert_eq!(msg.sections, vec![UNKNOWN]);
    }
}
