//! Organization audit-trail rule engine.
//!
//! An alternate pipeline over decoded log batches: every line is parsed as
//! a trail record and evaluated against a configuration-driven rule list
//! instead of the event type registry. Unlike the classifier, matching is
//! not first-match: every matching rule independently dispatches its own
//! notification, so rules compose additively.

pub mod decode;
pub mod record;
pub mod rules;

use tracing::{debug, error, info, warn};

use vigil_dispatch::{Dispatcher, NotificationSink};
use vigil_types::{EventType, Message, MonitoringRule, RuleMatcher};

pub use decode::{decode_subscription_payload, DecodedBatch, LogLine};
pub use record::{TrailRecord, UserIdentity};

/// Summary of one processed batch, for logging and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Log lines in the batch.
    pub lines: usize,
    /// Lines that failed to parse as trail records.
    pub malformed: usize,
    /// Notifications successfully handed to the sink.
    pub dispatched: usize,
    /// Rule evaluations or sends that failed.
    pub failed: usize,
}

/// Evaluates monitoring rules against trail records and dispatches matches.
pub struct RuleEngine<'a, S: NotificationSink> {
    dispatcher: &'a Dispatcher<S>,
}

impl<'a, S: NotificationSink> RuleEngine<'a, S> {
    pub fn new(dispatcher: &'a Dispatcher<S>) -> Self {
        RuleEngine { dispatcher }
    }

    /// Process one decoded batch of trail log lines.
    ///
    /// Each line, and each rule within a line, is an independent unit of
    /// work: a malformed line or a failing rule is logged and skipped
    /// without aborting the rest of the batch.
    pub fn handle_log_batch(&self, batch: &DecodedBatch) -> BatchSummary {
        let mut summary = BatchSummary::default();

        if batch.is_control_message() {
            debug!(log_group = %batch.log_group, "control message, skipping");
            return summary;
        }

        summary.lines = batch.log_events.len();
        for line in &batch.log_events {
            let record = match TrailRecord::from_json(&line.message) {
                Ok(record) => record,
                Err(e) => {
                    warn!(log_group = %batch.log_group, "skipping malformed log line: {e}");
                    summary.malformed += 1;
                    continue;
                }
            };
            self.evaluate_record(&record, &mut summary);
        }

        info!(
            log_group = %batch.log_group,
            lines = summary.lines,
            malformed = summary.malformed,
            dispatched = summary.dispatched,
            failed = summary.failed,
            "trail batch processed"
        );
        summary
    }

    /// Evaluate every applicable rule against one record.
    ///
    /// Global rules always apply; account rules apply when the record's
    /// recipient account is configured. All matches dispatch, in list order.
    fn evaluate_record(&self, record: &TrailRecord, summary: &mut BatchSummary) {
        let config = self.dispatcher.config();
        let account = record
            .recipient_account_id
            .as_deref()
            .and_then(|id| config.account(id));

        let account_name = account
            .map(|a| a.account_name.as_str())
            .or(record.recipient_account_id.as_deref())
            .unwrap_or("unknown account");
        let environment = account.map(|a| a.environment.as_str()).unwrap_or("default");

        let account_rules = account.map(|a| a.rules.as_slice()).unwrap_or(&[]);
        let applicable = config.global_rules.iter().chain(account_rules);

        for rule in applicable {
            match rules::matches_rule(rule, record) {
                Ok(false) => {}
                Ok(true) => {
                    let message = format_rule_match(rule, record, account_name);
                    let priority = rule.priority.for_environment(environment);
                    match self
                        .dispatcher
                        .deliver(EventType::OrgTrailForwarded, &message, priority)
                    {
                        Ok(()) => summary.dispatched += 1,
                        Err(e) => {
                            error!(rule = %rule.description, "rule notification failed: {e}");
                            summary.failed += 1;
                        }
                    }
                }
                Err(e) => {
                    error!(rule = %rule.description, "rule evaluation failed: {e}");
                    summary.failed += 1;
                }
            }
        }
    }
}

/// Build the notification message for one rule match.
///
/// Pure, like the registry formatters: rule plus record in, message out.
pub fn format_rule_match(
    rule: &MonitoringRule,
    record: &TrailRecord,
    account_name: &str,
) -> Message {
    let principal = record.user_identity.principal_name();

    let body = match &rule.matcher {
        RuleMatcher::KeyUsage { key_arn, .. } => {
            format!(
                "{} event detected for key {key_arn} by {principal}",
                record.event_name
            )
        }
        RuleMatcher::SecretUsage { .. } => {
            let secret = record.requested_secret_id().unwrap_or("(unknown secret)");
            format!(
                "{} event detected for secret {secret} by {principal}",
                record.event_name
            )
        }
        RuleMatcher::RoleAssumption { role_name } => {
            format!("{} event detected for role {role_name}", record.event_name)
        }
        RuleMatcher::LocalDeploy { .. } => {
            let role = record
                .resource_arn_or_first("AWS::IAM::Role")
                .unwrap_or("(unknown role)");
            format!("Local deployment detected: {principal} assumed {role}")
        }
    };

    Message::new()
        .header(format!("🔐 {}", rule.description))
        .context("Account", account_name)
        .context("Principal", principal)
        .context("Event", record.event_name.as_str())
        .section(body)
}
