//! Security-facing formatters: Inspector findings, Security Hub findings,
//! and CloudFormation drift detection.

use vigil_types::{InboundEvent, Message};

use crate::{detail_at, UNKNOWN};

pub fn format_inspector(event: &InboundEvent, account_name: &str) -> Message {
    let title = detail_at(event, "/title");
    let severity = detail_at(event, "/severity");
    let description = detail_at(event, "/description");

    // The finding names the affected resource; an Inspector finding without
    // one is still notifiable, just less actionable.
    let resource = event
        .detail()
        .and_then(|d| d.pointer("/resources/0/id"))
        .and_then(|v| v.as_str())
        .unwrap_or(UNKNOWN);

    Message::new()
        .header(format!("🔍 Inspector finding: {title}"))
        .context("Account", account_name)
        .context("Severity", severity)
        .context("Resource", resource)
        .section(description)
}

pub fn format_security_hub(event: &InboundEvent, account_name: &str) -> Message {
    let finding = event.detail().and_then(|d| d.pointer("/findings/0"));

    let title = finding
        .and_then(|f| f.get("Title"))
        .and_then(|v| v.as_str())
        .unwrap_or(UNKNOWN);
    let severity = finding
        .and_then(|f| f.pointer("/Severity/Label"))
        .and_then(|v| v.as_str())
        .unwrap_or(UNKNOWN);
    let description = finding
        .and_then(|f| f.get("Description"))
        .and_then(|v| v.as_str())
        .unwrap_or(UNKNOWN);

    Message::new()
        .header(format!("🚨 Security Hub: {title}"))
        .context("Account", account_name)
        .context("Severity", severity)
        .section(description)
        .link(
            "Open Security Hub",
            "https://console.aws.amazon.com/securityhub/home#/findings",
        )
}

pub fn format_drift(event: &InboundEvent, account_name: &str) -> Message {
    let stack_id = detail_at(event, "/stack-id");
    let status = event
        .detail()
        .and_then(|d| d.pointer("/status-details/stack-drift-status"))
        .and_then(|v| v.as_str())
        .unwrap_or(UNKNOWN);

    // The stack name is the second-to-last ARN segment:
    // arn:aws:cloudformation:…:stack/<name>/<uuid>
    let stack_name = stack_id
        .rsplit('/')
        .nth(1)
        .unwrap_or(stack_id);

    Message::new()
        .header(format!("Stack drift detected: {stack_name}"))
        .context("Account", account_name)
        .context("Drift status", status)
        .section(format!(
            "CloudFormation reported drift status {status} for stack {stack_name}. \
             Review the stack and reconcile manual changes."
        ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn inspector_finding_carries_severity_and_resource() {
        let event = InboundEvent::new(json!({
            "detail": {
                "title": "CVE-2024-0001 in openssl",
                "severity": "CRITICAL",
                "description": "Remote code execution in openssl.",
                "resources": [{"id": "i-0abc123"}]
            }
        }));
        let msg = format_inspector(&event, "acct");
        assert!(msg.header.as_deref().unwrap().contains("CVE-2024-0001"));
        assert!(msg.context.contains(&("Severity".into(), "CRITICAL".into())));
        assert!(msg.context.contains(&("Resource".into(), "i-0abc123".into())));
    }

    #[test]
    fn security_hub_reads_first_finding() {
        let event = InboundEvent::new(json!({
            "detail": {
                "findings": [{
                    "Title": "S3 bucket public",
                    "Description": "Bucket allows public read.",
                    "Severity": {"Label": "HIGH"}
                }]
            }
        }));
        let msg = format_security_hub(&event, "acct");
        assert!(msg.header.as_deref().unwrap().contains("S3 bucket public"));
        assert_eq!(msg.sections, vec!["Bucket allows public read."]);
    }

    #[test]
    fn drift_extracts_stack_name_from_arn() {
        let event = InboundEvent::new(json!({
            "detail": {
                "stack-id": "arn:aws:cloudformation:eu-west-1:111122223333:stack/api-stack/uuid-1",
                "status-details": {"stack-drift-status": "DRIFTED"}
            }
        }));
        let msg = format_drift(&event, "acct");
        assert_eq!(msg.header.as_deref(), Some("Stack drift detected: api-stack"));
        assert!(msg.sections[0].contains("DRIFTED"));
    }

    #[test]
    fn empty_events_do_not_panic() {
        let empty = InboundEvent::new(json!({}));
        format_inspector(&empty, "a");
        format_security_hub(&empty, "a");
        format_drift(&empty, "a");
    }
}
