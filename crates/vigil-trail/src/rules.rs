//! Monitoring rule matching against trail records.
//!
//! Each [`RuleMatcher`] kind has its own semantics; all of them are
//! side-effect free. A rule that structurally requires a field the record
//! lacks (a key-usage match without a key resource, say) returns an error
//! instead of a silent non-match, so the engine can log it per rule.

use vigil_types::{MonitoringRule, RuleMatcher, VigilError};

use crate::record::TrailRecord;

const KMS_EVENT_SOURCE: &str = "kms.amazonaws.com";
const SECRETS_EVENT_SOURCE: &str = "secretsmanager.amazonaws.com";
const ASSUME_ROLE_PREFIX: &str = "AssumeRole";
const KMS_KEY_RESOURCE_TYPE: &str = "AWS::KMS::Key";
const IAM_ROLE_RESOURCE_TYPE: &str = "AWS::IAM::Role";

/// Check whether a record matches a rule.
///
/// `Ok(true)` dispatches a notification, `Ok(false)` is a clean non-match,
/// `Err` means the record claimed the rule's shape but is missing a field
/// the matcher cannot work without.
pub fn matches_rule(rule: &MonitoringRule, record: &TrailRecord) -> Result<bool, VigilError> {
    match &rule.matcher {
        RuleMatcher::KeyUsage {
            key_arn,
            include_events,
            exclude_events,
        } => {
            if record.event_source.as_deref() != Some(KMS_EVENT_SOURCE) {
                return Ok(false);
            }
            if !event_name_passes(&record.event_name, include_events, exclude_events) {
                return Ok(false);
            }
            let resource = record
                .resource_arn_or_first(KMS_KEY_RESOURCE_TYPE)
                .ok_or_else(|| {
                    VigilError::Format(format!(
                        "key-usage rule {:?}: KMS event {} carries no key resource",
                        rule.description, record.event_name
                    ))
                })?;
            Ok(resource == key_arn)
        }

        RuleMatcher::SecretUsage {
            secret_arn_prefix,
            include_events,
            exclude_events,
        } => {
            if record.event_source.as_deref() != Some(SECRETS_EVENT_SOURCE) {
                return Ok(false);
            }
            if !event_name_passes(&record.event_name, include_events, exclude_events) {
                return Ok(false);
            }
            let secret_id = record.requested_secret_id().ok_or_else(|| {
                VigilError::Format(format!(
                    "secret-usage rule {:?}: event {} carries no secretId",
                    rule.description, record.event_name
                ))
            })?;
            // Prefix, not equality: callers may pass either the full ARN or
            // an ARN with the random suffix appended.
            Ok(secret_id.starts_with(secret_arn_prefix))
        }

        RuleMatcher::RoleAssumption { role_name } => {
            if !record.event_name.starts_with(ASSUME_ROLE_PREFIX) {
                return Ok(false);
            }
            let role_arn = record
                .resource_arn_or_first(IAM_ROLE_RESOURCE_TYPE)
                .ok_or_else(|| {
                    VigilError::Format(format!(
                        "role rule {:?}: {} record carries no role resource",
                        rule.description, record.event_name
                    ))
                })?;
            // Substring, not suffix: tolerate path-prefixed role ARNs.
            Ok(role_arn.contains(role_name))
        }

        RuleMatcher::LocalDeploy {
            principal_arn_contains,
            assumed_role_arn_contains,
        } => {
            if !record.event_name.starts_with(ASSUME_ROLE_PREFIX) {
                return Ok(false);
            }
            let caller_arn = match record.user_identity.arn.as_deref() {
                Some(arn) => arn,
                None => return Ok(false),
            };
            let assumed_arn = record
                .resource_arn_or_first(IAM_ROLE_RESOURCE_TYPE)
                .ok_or_else(|| {
                    VigilError::Format(format!(
                        "local-deploy rule {:?}: {} record carries no role resource",
                        rule.description, record.event_name
                    ))
                })?;
            Ok(caller_arn.contains(principal_arn_contains)
                && assumed_arn.contains(assumed_role_arn_contains))
        }
    }
}

/// Include first, then exclude. An empty include list admits everything.
fn event_name_passes(event_name: &str, include: &[String], exclude: &[String]) -> bool {
    if !include.is_empty() && !include.iter().any(|e| e == event_name) {
        return false;
    }
    !exclude.iter().any(|e| e == event_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use vigil_types::{Priority, RulePriority};

    fn rule(matcher: RuleMatcher) -> MonitoringRule {
        MonitoringRule {
            description: "test rule".into(),
            priority: RulePriority::Fixed(Priority::High),
            matcher,
        }
    }

    fn kms_record(event_name: &str, key_arn: &str) -> TrailRecord {
        serde_json::from_value(json!({
            "eventName": event_name,
            "eventSource": "kms.amazonaws.com",
            "resources": [{"ARN": key_arn, "type": "AWS::KMS::Key"}]
        }))
        .unwrap()
    }

    #[test]
    fn key_usage_exact_arn_match() {
        let r = rule(RuleMatcher::KeyUsage {
            key_arn: "arn:aws:kms:eu-west-1:1:key/abc".into(),
            include_events: vec![],
            exclude_events: vec![],
        });
        assert!(matches_rule(&r, &kms_record("Decrypt", "arn:aws:kms:eu-west-1:1:key/abc")).unwrap());
        assert!(!matches_rule(&r, &kms_record("Decrypt", "arn:aws:kms:eu-west-1:1:key/xyz")).unwrap());
    }

    #[test]
    fn key_usage_include_then_exclude() {
        let r = rule(RuleMatcher::KeyUsage {
            key_arn: "arn:key".into(),
            include_events: vec!["Decrypt".into(), "Encrypt".into()],
            exclude_events: vec!["Encrypt".into()],
        });
        assert!(matches_rule(&r, &kms_record("Decrypt", "arn:key")).unwrap());
        assert!(!matches_rule(&r, &kms_record("Encrypt", "arn:key")).unwrap());
        assert!(!matches_rule(&r, &kms_record("GenerateDataKey", "arn:key")).unwrap());
    }

    #[test]
    fn key_usage_without_key_resource_errors() {
        let r = rule(RuleMatcher::KeyUsage {
            key_arn: "arn:key".into(),
            include_events: vec![],
            exclude_events: vec![],
        });
        let record: TrailRecord = serde_json::from_value(json!({
            "eventName": "Decrypt",
            "eventSource": "kms.amazonaws.com"
        }))
        .unwrap();
        assert!(matches!(matches_rule(&r, &record), Err(VigilError::Format(_))));
    }

    #[test]
    fn key_usage_ignores_other_sources() {
        let r = rule(RuleMatcher::KeyUsage {
            key_arn: "arn:key".into(),
            include_events: vec![],
            exclude_events: vec![],
        });
        let record: TrailRecord = serde_json::from_value(json!({
            "eventName": "Decrypt",
            "eventSource": "s3.amazonaws.com"
        }))
        .unwrap();
        // Wrong source is a clean non-match even though resources are absent.
        assert!(!matches_rule(&r, &record).unwrap());
    }

    #[test]
    fn secret_usage_is_prefix_match() {
        let r = rule(RuleMatcher::SecretUsage {
            secret_arn_prefix: "arn:aws:secretsmanager:eu-west-1:1:secret:db-password".into(),
            include_events: vec![],
            exclude_events: vec![],
        });
        let record: TrailRecord = serde_json::from_value(json!({
            "eventName": "GetSecretValue",
            "eventSource": "secretsmanager.amazonaws.com",
            "requestParameters": {
                "secretId": "arn:aws:secretsmanager:eu-west-1:1:secret:db-password-AbC123"
            }
        }))
        .unwrap();
        assert!(matches_rule(&r, &record).unwrap());
    }

    #[test]
    fn role_assumption_is_substring_match() {
        let r = rule(RuleMatcher::RoleAssumption {
            role_name: "admin-role".into(),
        });
        let record: TrailRecord = serde_json::from_value(json!({
            "eventName": "AssumeRole",
            "resources": [{"ARN": "arn:aws:iam::1:role/path/admin-role", "type": "AWS::IAM::Role"}]
        }))
        .unwrap();
        assert!(matches_rule(&r, &record).unwrap());

        let other: TrailRecord = serde_json::from_value(json!({
            "eventName": "ConsoleLogin",
            "resources": []
        }))
        .unwrap();
        assert!(!matches_rule(&r, &other).unwrap());
    }

    #[test]
    fn local_deploy_requires_both_substrings() {
        let r = rule(RuleMatcher::LocalDeploy {
            principal_arn_contains: "user/".into(),
            assumed_role_arn_contains: "deploy-role".into(),
        });
        let human: TrailRecord = serde_json::from_value(json!({
            "eventName": "AssumeRole",
            "userIdentity": {"type": "IAMUser", "arn": "arn:aws:iam::1:user/jane"},
            "resources": [{"ARN": "arn:aws:iam::1:role/deploy-role", "type": "AWS::IAM::Role"}]
        }))
        .unwrap();
        assert!(matches_rule(&r, &human).unwrap());

        let pipeline: TrailRecord = serde_json::from_value(json!({
            "eventName": "AssumeRole",
            "userIdentity": {"type": "AssumedRole", "arn": "arn:aws:sts::1:assumed-role/ci"},
            "resources": [{"ARN": "arn:aws:iam::1:role/deploy-role", "type": "AWS::IAM::Role"}]
        }))
        .unwrap();
        assert!(!matches_rule(&r, &pipeline).unwrap());
    }
}
