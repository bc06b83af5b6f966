//! Static monitoring configuration.
//!
//! [`MonitoringConfig`] is the full deployment table loaded once from
//! `vigil.toml` at process start and treated as immutable: per-account
//! names, environments and scoped [`MonitoringRule`]s, the global rule
//! list, alarm-name exclusion patterns, and the per-priority sink
//! endpoints. All regex patterns are compiled during [`MonitoringConfig::validate`]
//! so an invalid pattern fails at load time, not at first match.

use std::collections::HashMap;

use regex::RegexBuilder;
use serde::{Deserialize, Serialize};

use crate::{Priority, VigilError};

/// Priority carried by a monitoring rule: either fixed, or keyed by the
/// target account's environment classification with a mandatory `default`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RulePriority {
    Fixed(Priority),
    PerEnvironment(HashMap<String, Priority>),
}

impl RulePriority {
    /// Resolve the priority for an account environment.
    ///
    /// Picks the environment-specific entry if present, else `default`.
    /// Validation guarantees the `default` key exists, so the fallback to
    /// `Priority::Medium` here is unreachable for validated configs.
    pub fn for_environment(&self, environment: &str) -> Priority {
        match self {
            RulePriority::Fixed(p) => *p,
            RulePriority::PerEnvironment(map) => map
                .get(environment)
                .or_else(|| map.get("default"))
                .copied()
                .unwrap_or(Priority::Medium),
        }
    }
}

/// The single matcher kind of a monitoring rule.
///
/// A rule has exactly one matcher, enforced structurally by this enum.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleMatcher {
    /// Match usage of one KMS key by exact key ARN, optionally filtered
    /// by event-name include/exclude lists (include first, then exclude).
    KeyUsage {
        key_arn: String,
        #[serde(default)]
        include_events: Vec<String>,
        #[serde(default)]
        exclude_events: Vec<String>,
    },
    /// Match access to secrets whose ARN starts with the given prefix,
    /// with the same include/exclude event-name filtering.
    SecretUsage {
        secret_arn_prefix: String,
        #[serde(default)]
        include_events: Vec<String>,
        #[serde(default)]
        exclude_events: Vec<String>,
    },
    /// Match AssumeRole calls whose role resource ARN contains the given
    /// role name. Substring on purpose: role ARNs may carry path prefixes.
    RoleAssumption { role_name: String },
    /// Match AssumeRole calls fingerprinting a human-operator local deploy:
    /// both the caller identity ARN and the newly assumed role ARN must
    /// contain their configured substrings.
    LocalDeploy {
        principal_arn_contains: String,
        assumed_role_arn_contains: String,
    },
}

/// Declarative matcher against organization audit-trail records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringRule {
    /// Human-readable description, used in the notification header.
    pub description: String,
    /// Priority of notifications this rule produces.
    pub priority: RulePriority,
    /// What the rule matches.
    #[serde(flatten)]
    pub matcher: RuleMatcher,
}

/// One monitored account: identifier, human name, environment
/// classification, and the rules scoped to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountConfiguration {
    pub account_id: String,
    pub account_name: String,
    /// Environment classification (`development`, `acceptance`,
    /// `production`, ...). Keys [`RulePriority::PerEnvironment`] lookups.
    pub environment: String,
    #[serde(default)]
    pub rules: Vec<MonitoringRule>,
}

/// Full static configuration for a Vigil deployment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonitoringConfig {
    /// Monitored accounts with their scoped rules.
    #[serde(default)]
    pub accounts: Vec<AccountConfiguration>,
    /// Rules applied to every account in addition to its own.
    #[serde(default)]
    pub global_rules: Vec<MonitoringRule>,
    /// Alarm-name patterns (regex, case-insensitive) suppressed by the gate.
    #[serde(default)]
    pub excluded_alarm_patterns: Vec<String>,
    /// Sink endpoint URL per priority tier.
    #[serde(default)]
    pub sink_endpoints: HashMap<Priority, String>,
    /// Path to the SQLite dispatch history database.
    #[serde(default)]
    pub dispatch_log_path: Option<std::path::PathBuf>,
}

impl MonitoringConfig {
    /// Parse and validate a configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, VigilError> {
        let config: MonitoringConfig =
            toml::from_str(content).map_err(|e| VigilError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Look up an account's configuration by id.
    pub fn account(&self, account_id: &str) -> Option<&AccountConfiguration> {
        self.accounts.iter().find(|a| a.account_id == account_id)
    }

    /// Resolve a human-readable account name, falling back to the raw id.
    pub fn account_name<'a>(&'a self, account_id: &'a str) -> &'a str {
        self.account(account_id)
            .map(|a| a.account_name.as_str())
            .unwrap_or(account_id)
    }

    /// Fail fast on shape violations: invalid exclusion regexes and
    /// per-environment priority maps missing the `default` entry.
    pub fn validate(&self) -> Result<(), VigilError> {
        for pattern in &self.excluded_alarm_patterns {
            RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .map_err(|e| {
                    VigilError::Config(format!("invalid exclusion pattern {pattern:?}: {e}"))
                })?;
        }

        let account_rules = self.accounts.iter().flat_map(|a| a.rules.iter());
        for rule in self.global_rules.iter().chain(account_rules) {
            if let RulePriority::PerEnvironment(map) = &rule.priority {
                if !map.contains_key("default") {
                    return Err(VigilError::Config(format!(
                        "rule {:?}: per-environment priority map must contain a \"default\" entry",
                        rule.description
                    )));
                }
            }
        }
        Ok(())
    }
}
