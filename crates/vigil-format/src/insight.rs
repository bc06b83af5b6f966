//! DevOps Guru insight and ACM certificate expiry formatters.

use vigil_types::{InboundEvent, Message};

use crate::{detail_at, UNKNOWN};

pub fn format_devops(event: &InboundEvent, account_name: &str) -> Message {
    let description = detail_at(event, "/insightDescription");
    let severity = detail_at(event, "/insightSeverity");
    let url = event
        .detail()
        .and_then(|d| d.get("insightUrl"))
        .and_then(|v| v.as_str());

    let mut message = Message::new()
        .header("DevOps Guru: new insight")
        .context("Account", account_name)
        .context("Severity", severity)
        .section(description);

    if let Some(url) = url {
        message = message.link("Open insight", url);
    }
    message
}

pub fn format_certificate(event: &InboundEvent, account_name: &str) -> Message {
    let arn = event
        .raw()
        .get("resources")
        .and_then(|r| r.get(0))
        .and_then(|v| v.as_str())
        .unwrap_or(UNKNOWN);
    let days = event
        .detail()
        .and_then(|d| d.get("daysToExpiry"))
        .and_then(|v| v.as_i64());
    let common_name = detail_at(event, "/commonName");

    let when = match days {
        Some(d) => format!("expires in {d} day(s)"),
        None => "is approaching expiration".to_string(),
    };

    Message::new()
        .header(format!("⚠️ Certificate {common_name} {when}"))
        .context("Account", account_name)
        .context("Certificate", arn)
        .section(format!("Certificate {common_name} ({arn}) {when}. Renew or replace it before it lapses."))
}
