//! Compute state change formatters: ECS tasks and EC2 instances.

use vigil_types::{InboundEvent, Message};

use crate::{detail_at, UNKNOWN};

/// Format an ECS task state change.
///
/// Interesting fields live under `detail`: the task's `lastStatus`,
/// `desiredStatus`, `group` (service name), and `stoppedReason` when the
/// task died.
pub fn format_ecs(event: &InboundEvent, account_name: &str) -> Message {
    let last_status = detail_at(event, "/lastStatus");
    let desired_status = detail_at(event, "/desiredStatus");
    let group = detail_at(event, "/group");
    let stopped_reason = event
        .detail()
        .and_then(|d| d.get("stoppedReason"))
        .and_then(|v| v.as_str());

    let mut message = Message::new()
        .header(format!("ECS task state change: {group}"))
        .context("Account", account_name)
        .context("Status", format!("{last_status} (desired {desired_status})"));

    if let Some(reason) = stopped_reason {
        message = message.section(format!("Stopped: {reason}"));
    } else {
        message = message.section(format!("Task group {group} is now {last_status}."));
    }
    message
}

/// Format an EC2 instance state-change notification.
pub fn format_ec2(event: &InboundEvent, account_name: &str) -> Message {
    let instance_id = detail_at(event, "/instance-id");
    let state = detail_at(event, "/state");

    Message::new()
        .header(format!("EC2 instance {instance_id} is {state}"))
        .context("Account", account_name)
        .context("Instance", instance_id)
        .section(format!("Instance {instance_id} entered state {state}."))
}
