//! CodePipeline execution state change formatter.

use vigil_types::{InboundEvent, Message};

use crate::detail_at;

pub fn format(event: &InboundEvent, account_name: &str) -> Message {
    let pipeline = detail_at(event, "/pipeline");
    let state = detail_at(event, "/state");
    let execution_id = detail_at(event, "/execution-id");
    let region = event
        .raw()
        .get("region")
        .and_then(|v| v.as_str())
        .unwrap_or("eu-west-1");

    let icon = match state {
        "SUCCEEDED" => "✅",
        "FAILED" => "❌",
        _ => "▶️",
    };

    Message::new()
        .header(format!("{icon} Pipeline {pipeline}: {state}"))
        .context("Account", account_name)
        .context("Execution", execution_id)
        .section(format!("Pipeline {pipeline} moved to state {state}."))
        .link(
            "Open pipeline",
            format!(
                "https://{region}.console.aws.amazon.com/codesuite/codepipeline/pipelines/{pipeline}/view"
            ),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn failed_pipeline_gets_cross_mark() {
        let event = InboundEvent::new(json!({
            "region": "eu-west-1",
            "detail": {"pipeline": "deploy-prod", "state": "FAILED", "execution-id": "e-1"}
        }));
        let msg = format(&event, "acct");
        assert!(msg.header.as_deref().unwrap().starts_with("❌"));
        assert!(msg.link.as_ref().unwrap().url.contains("deploy-prod"));
    }

    #[test]
    fn succeeded_pipeline_gets_check_mark() {
        let event = InboundEvent::new(json!({
            "detail": {"pipeline": "deploy-prod", "state": "SUCCEEDED"}
        }));
        let msg = format(&event, "acct");
        assert!(msg.header.as_deref().unwrap().starts_with("✅"));
    }
}
