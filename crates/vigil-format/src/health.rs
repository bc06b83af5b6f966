//! AWS Health event formatter.

use vigil_types::{InboundEvent, Message};

use crate::{detail_at, UNKNOWN};

pub fn format(event: &InboundEvent, account_name: &str) -> Message {
    let service = detail_at(event, "/service");
    let category = detail_at(event, "/eventTypeCategory");
    let code = detail_at(event, "/eventTypeCode");

    // Health events carry their prose in a list of latestDescription blocks.
    let description = event
        .detail()
        .and_then(|d| d.pointer("/eventDescription/0/latestDescription"))
        .and_then(|v| v.as_str())
        .unwrap_or(UNKNOWN);

    Message::new()
        .header(format!("AWS Health: {service} ({category})"))
        .context("Account", account_name)
        .context("Event", code)
        .section(description)
        .link(
            "AWS Health Dashboard",
            "https://health.aws.amazon.com/health/home",
        )
}
