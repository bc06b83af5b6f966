//! Integration tests for the audit-trail path: decode a subscription
//! payload end-to-end and run it through the rule engine with a TOML-loaded
//! configuration, the way the `trail` subcommand does.

use std::io::Write;
use std::sync::Mutex;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde_json::json;

use vigil::dispatch::{Dispatcher, NotificationSink};
use vigil::trail::{decode_subscription_payload, RuleEngine};
use vigil::types::{Message, MonitoringConfig, Priority, VigilError};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

#[derive(Default)]
struct RecordingSink {
    sent: Mutex<Vec<(String, Priority)>>,
}

impl RecordingSink {
    fn sent(&self) -> Vec<(String, Priority)> {
        self.sent.lock().unwrap().clone()
    }
}

impl NotificationSink for RecordingSink {
    fn send(&self, message: &Message, priority: Priority) -> Result<(), VigilError> {
        self.sent
            .lock()
            .unwrap()
            .push((message.to_plain_text(), priority));
        Ok(())
    }
}

fn encode_payload(batch_json: &str) -> String {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(batch_json.as_bytes()).unwrap();
    STANDARD.encode(encoder.finish().unwrap())
}

fn batch_payload(lines: &[String]) -> String {
    let events: Vec<_> = lines
        .iter()
        .map(|message| json!({"timestamp": 1_700_000_000_000i64, "message": message}))
        .collect();
    encode_payload(
        &json!({
            "messageType": "DATA_MESSAGE",
            "logGroup": "org-trail",
            "logEvents": events,
        })
        .to_string(),
    )
}

fn assume_role_line() -> String {
    json!({
        "eventName": "AssumeRole",
        "eventSource": "sts.amazonaws.com",
        "recipientAccountId": "111122223333",
        "userIdentity": {"type": "IAMUser", "userName": "jane"},
        "resources": [
            {"ARN": "arn:aws:iam::111122223333:role/admin-role", "type": "AWS::IAM::Role"}
        ]
    })
    .to_string()
}

const CONFIG: &str = r#"
    [[global_rules]]
    description = "Privileged role assumed anywhere"
    priority = "high"
    kind = "role_assumption"
    role_name = "admin-role"

    [[accounts]]
    account_id = "111122223333"
    account_name = "workload-prod"
    environment = "production"

    [[accounts.rules]]
    description = "Admin role assumed in workload-prod"
    priority = "critical"
    kind = "role_assumption"
    role_name = "admin-role"
"#;

fn dispatcher() -> Dispatcher<RecordingSink> {
    let config = MonitoringConfig::from_toml(CONFIG).expect("config should be valid");
    Dispatcher::new(config, RecordingSink::default())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn assume_role_dispatches_for_every_matching_rule() {
    let d = dispatcher();
    let batch = decode_subscription_payload(&batch_payload(&[assume_role_line()])).unwrap();
    let summary = RuleEngine::new(&d).handle_log_batch(&batch);

    // Global and account-scoped rule both match the same record.
    assert_eq!(summary.dispatched, 2);
    let sent = d.sink().sent();
    let priorities: Vec<_> = sent.iter().map(|(_, p)| *p).collect();
    assert!(priorities.contains(&Priority::High));
    assert!(priorities.contains(&Priority::Critical));
    assert!(sent[0]
        .0
        .contains("AssumeRole event detected for role admin-role"));
}

#[test]
fn principal_and_account_appear_in_notification() {
    let d = dispatcher();
    let batch = decode_subscription_payload(&batch_payload(&[assume_role_line()])).unwrap();
    RuleEngine::new(&d).handle_log_batch(&batch);

    let text = &d.sink().sent()[0].0;
    assert!(text.contains("jane"));
    assert!(text.contains("workload-prod"));
}

#[test]
fn malformed_line_is_logged_not_fatal() {
    let d = dispatcher();
    let batch = decode_subscription_payload(&batch_payload(&[
        "{ definitely not a trail record".to_string(),
        assume_role_line(),
    ]))
    .unwrap();
    let summary = RuleEngine::new(&d).handle_log_batch(&batch);

    assert_eq!(summary.lines, 2);
    assert_eq!(summary.malformed, 1);
    assert_eq!(summary.dispatched, 2);
}

#[test]
fn non_matching_records_stay_silent() {
    let d = dispatcher();
    let line = json!({
        "eventName": "DescribeInstances",
        "eventSource": "ec2.amazonaws.com",
        "recipientAccountId": "111122223333",
        "userIdentity": {"type": "IAMUser", "userName": "jane"}
    })
    .to_string();
    let batch = decode_subscription_payload(&batch_payload(&[line])).unwrap();
    let summary = RuleEngine::new(&d).handle_log_batch(&batch);

    assert_eq!(summary.dispatched, 0);
    assert!(d.sink().sent().is_empty());
}

#[test]
fn undecodable_payload_is_fatal() {
    assert!(decode_subscription_payload("%%% not base64 %%%").is_err());
    assert!(decode_subscription_payload(&STANDARD.encode(b"not gzip")).is_err());
}

#[test]
fn control_message_batch_is_skipped() {
    let d = dispatcher();
    let payload = encode_payload(
        r#"{"messageType": "CONTROL_MESSAGE", "logGroup": "org-trail", "logEvents": []}"#,
    );
    let batch = decode_subscription_payload(&payload).unwrap();
    let summary = RuleEngine::new(&d).handle_log_batch(&batch);

    assert_eq!(summary.lines, 0);
    assert!(d.sink().sent().is_empty());
}
