//! Notification dispatch orchestration.
//!
//! The [`Dispatcher`] drives one event through the pipeline: classify,
//! gate, format, resolve priority, send. Per-event failures are caught and
//! logged here and never propagate past the dispatcher, so one malformed
//! event cannot block its siblings in an at-least-once delivery batch.

pub mod log;
pub mod priority;
pub mod sink;

use chrono::Utc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use rusqlite::Connection;
use vigil_types::{EventType, InboundEvent, Message, MonitoringConfig, Priority, VigilError};

pub use sink::{NotificationSink, WebhookSink, WirePayload};

/// What happened to one dispatched event. Informational only: `dispatch`
/// never errors, in line with the transport boundary contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The gate decided no notification is warranted.
    Suppressed(EventType),
    /// A notification was handed to the sink.
    Sent(EventType, Priority),
    /// Formatting or delivery failed; logged, siblings unaffected.
    Failed(EventType),
}

/// Orchestrates classification, gating, formatting, priority resolution,
/// and delivery for inbound events.
pub struct Dispatcher<S: NotificationSink> {
    config: MonitoringConfig,
    sink: S,
    log_conn: Option<Connection>,
}

impl<S: NotificationSink> Dispatcher<S> {
    /// Build a dispatcher over an immutable configuration and a sink.
    ///
    /// Opens the SQLite dispatch log when the config names one; a log that
    /// cannot be opened disables history recording but not dispatch.
    pub fn new(config: MonitoringConfig, sink: S) -> Self {
        let log_conn = config.dispatch_log_path.as_ref().and_then(|path| {
            match Connection::open(path).and_then(|conn| {
                conn.execute_batch(log::CREATE_TABLE_SQL)?;
                Ok(conn)
            }) {
                Ok(conn) => Some(conn),
                Err(e) => {
                    warn!("dispatch log disabled, cannot open {}: {e}", path.display());
                    None
                }
            }
        });

        Dispatcher {
            config,
            sink,
            log_conn,
        }
    }

    /// Process one inbound event end to end. Never errors.
    pub fn dispatch(&self, event: &InboundEvent) -> DispatchOutcome {
        let event_type = vigil_classify::classify(event);

        if !vigil_classify::should_alert(event_type, event, &self.config.excluded_alarm_patterns) {
            debug!(%event_type, "event gated, no notification");
            return DispatchOutcome::Suppressed(event_type);
        }

        let account_name = event
            .account_id()
            .map(|id| self.config.account_name(id).to_string())
            .unwrap_or_else(|| "unknown account".to_string());

        let message = match vigil_format::format(event_type, event, &account_name) {
            Ok(message) => message,
            Err(e) => {
                error!(%event_type, "failed to format event: {e}");
                self.send_fallback_notice(event_type);
                return DispatchOutcome::Failed(event_type);
            }
        };

        let priority = priority::resolve(event_type);
        match self.deliver(event_type, &message, priority) {
            Ok(()) => {
                info!(%event_type, %priority, "notification dispatched");
                DispatchOutcome::Sent(event_type, priority)
            }
            Err(e) => {
                error!(%event_type, %priority, "notification delivery failed: {e}");
                DispatchOutcome::Failed(event_type)
            }
        }
    }

    /// Process a batch of independent events with per-event isolation.
    ///
    /// No ordering or deduplication guarantees; each event is one unit of
    /// work and a failure in one never aborts the rest.
    pub fn dispatch_batch<'a>(
        &self,
        events: impl IntoIterator<Item = &'a InboundEvent>,
    ) -> Vec<DispatchOutcome> {
        events.into_iter().map(|e| self.dispatch(e)).collect()
    }

    /// Send a message at an explicit priority, recording the attempt.
    ///
    /// Used directly by the trail engine, where priority comes from the
    /// matched rule instead of the type table.
    pub fn deliver(
        &self,
        event_type: EventType,
        message: &Message,
        priority: Priority,
    ) -> Result<(), VigilError> {
        let dispatch_id = Uuid::new_v4().to_string();
        let result = self.sink.send(message, priority);

        if let Some(conn) = &self.log_conn {
            let error = result.as_ref().err().map(|e| e.to_string());
            if let Err(db_err) = log::record_dispatch(
                conn,
                &dispatch_id,
                event_type.label(),
                priority.as_str(),
                message.rendered_header().as_deref(),
                Utc::now(),
                result.is_ok(),
                error.as_deref(),
            ) {
                error!("failed to record dispatch history: {db_err}");
            }
        }
        result
    }

    /// Best-effort "could not process" notice when formatting fails for an
    /// event that passed the gate. Itself failure-isolated.
    fn send_fallback_notice(&self, event_type: EventType) {
        let notice = Message::new()
            .header("⚠️ Could not process a monitoring event")
            .section(format!(
                "An event classified as {:?} passed the alert gate but could not be \
                 formatted. Check the pipeline logs for details.",
                event_type.label()
            ));
        if let Err(e) = self.deliver(event_type, &notice, Priority::Low) {
            warn!("fallback notice delivery failed: {e}");
        }
    }

    pub fn config(&self) -> &MonitoringConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    /// Sink that records sends and can be told to fail.
    struct RecordingSink {
        sent: Mutex<Vec<(Option<String>, Priority)>>,
        fail: bool,
    }

    impl RecordingSink {
        fn new() -> Self {
            RecordingSink {
                sent: Mutex::new(Vec::new()),
                fail: false,
            }
        }

        fn failing() -> Self {
            RecordingSink {
                sent: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        fn sent(&self) -> Vec<(Option<String>, Priority)> {
            self.sent.lock().unwrap().clone()
        }
    }

    impl NotificationSink for RecordingSink {
        fn send(&self, message: &Message, priority: Priority) -> Result<(), VigilError> {
            if self.fail {
                return Err(VigilError::Sink("simulated delivery failure".into()));
            }
            self.sent
                .lock()
                .unwrap()
                .push((message.rendered_header(), priority));
            Ok(())
        }
    }

    fn alarm_event(name: &str, state: &str) -> InboundEvent {
        InboundEvent::new(json!({
            "detail-type": "CloudWatch Alarm State Change",
            "account": "111122223333",
            "detail": {
                "alarmName": name,
                "state": {"value": state},
                "previousState": {"value": "OK"},
            }
        }))
    }

    fn config_with_exclusions(patterns: &[&str]) -> MonitoringConfig {
        MonitoringConfig {
            excluded_alarm_patterns: patterns.iter().map(|s| s.to_string()).collect(),
            ..MonitoringConfig::default()
        }
    }

    #[test]
    fn alarm_in_alarm_state_dispatches_high() {
        let dispatcher = Dispatcher::new(MonitoringConfig::default(), RecordingSink::new());
        let outcome = dispatcher.dispatch(&alarm_event("Foo", "ALARM"));

        assert_eq!(
            outcome,
            DispatchOutcome::Sent(EventType::AlarmStateChange, Priority::High)
        );
        let sent = dispatcher.sink().sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].0.as_deref().unwrap().contains("❗️ Alarm: Foo"));
        assert_eq!(sent[0].1, Priority::High);
    }

    #[test]
    fn excluded_alarm_sends_nothing() {
        let dispatcher =
            Dispatcher::new(config_with_exclusions(&["Foo.*"]), RecordingSink::new());
        let outcome = dispatcher.dispatch(&alarm_event("Foo", "ALARM"));

        assert_eq!(outcome, DispatchOutcome::Suppressed(EventType::AlarmStateChange));
        assert!(dispatcher.sink().sent().is_empty());
    }

    #[test]
    fn unhandled_event_is_gated() {
        let dispatcher = Dispatcher::new(MonitoringConfig::default(), RecordingSink::new());
        let outcome = dispatcher.dispatch(&InboundEvent::new(json!({"random": true})));
        assert_eq!(outcome, DispatchOutcome::Suppressed(EventType::Unhandled));
    }

    #[test]
    fn sink_failure_is_contained() {
        let dispatcher = Dispatcher::new(MonitoringConfig::default(), RecordingSink::failing());
        let outcome = dispatcher.dispatch(&alarm_event("Foo", "ALARM"));
        assert_eq!(outcome, DispatchOutcome::Failed(EventType::AlarmStateChange));
    }

    #[test]
    fn batch_isolates_failures_per_event() {
        let dispatcher = Dispatcher::new(MonitoringConfig::default(), RecordingSink::new());
        let good = alarm_event("Foo", "ALARM");
        let gated = InboundEvent::new(json!({"nothing": "here"}));
        let outcomes = dispatcher.dispatch_batch([&gated, &good, &gated]);

        assert_eq!(outcomes.len(), 3);
        assert_eq!(
            outcomes[1],
            DispatchOutcome::Sent(EventType::AlarmStateChange, Priority::High)
        );
        assert_eq!(dispatcher.sink().sent().len(), 1);
    }

    #[test]
    fn dispatch_log_records_attempts() {
        let dir = tempfile::tempdir().unwrap();
        let config = MonitoringConfig {
            dispatch_log_path: Some(dir.path().join("history.db")),
            ..MonitoringConfig::default()
        };
        let dispatcher = Dispatcher::new(config, RecordingSink::new());
        dispatcher.dispatch(&alarm_event("Foo", "ALARM"));

        let conn = Connection::open(dir.path().join("history.db")).unwrap();
        let entries = log::recent(&conn, 10).unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].success);
        assert_eq!(entries[0].priority, "high");
    }
}
