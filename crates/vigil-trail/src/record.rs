//! Organization-trail record model and principal resolution.

use serde::Deserialize;
use serde_json::Value;

use vigil_types::VigilError;

/// A resource referenced by a trail record.
///
/// The trail emits the ARN under `ARN` and the kind under `type`
/// (e.g. `AWS::KMS::Key`, `AWS::IAM::Role`).
#[derive(Debug, Clone, Deserialize)]
pub struct TrailResource {
    #[serde(rename = "ARN", alias = "arn")]
    pub arn: String,
    #[serde(rename = "type", default)]
    pub resource_type: Option<String>,
}

/// The session issuer inside an assumed-role session context.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionIssuer {
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub arn: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionContext {
    #[serde(default)]
    pub session_issuer: Option<SessionIssuer>,
}

/// The identity that performed the recorded API call.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    #[serde(rename = "type", default)]
    pub identity_type: Option<String>,
    #[serde(default)]
    pub arn: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub invoked_by: Option<String>,
    #[serde(default)]
    pub session_context: Option<SessionContext>,
}

/// Marker in session-issuer user names generated by SSO; such names carry
/// no operator identity, so resolution falls back to the full ARN.
const SSO_PLACEHOLDER_INFIX: &str = "AWSReservedSSO";

impl UserIdentity {
    /// Resolve a human-readable principal name.
    ///
    /// Preference order: assumed-role session-issuer user name (unless it is
    /// an SSO placeholder, then the full ARN), the invoking service name,
    /// the IAM/SAML user name, and finally the serialized identity.
    pub fn principal_name(&self) -> String {
        match self.identity_type.as_deref() {
            Some("AssumedRole") => {
                let issuer_name = self
                    .session_context
                    .as_ref()
                    .and_then(|c| c.session_issuer.as_ref())
                    .and_then(|i| i.user_name.as_deref());
                match issuer_name {
                    Some(name) if !name.contains(SSO_PLACEHOLDER_INFIX) => name.to_string(),
                    _ => self.arn.clone().unwrap_or_else(|| self.serialized()),
                }
            }
            Some("AWSService") => self
                .invoked_by
                .clone()
                .unwrap_or_else(|| self.serialized()),
            Some("IAMUser") | Some("SAMLUser") => self
                .user_name
                .clone()
                .unwrap_or_else(|| self.serialized()),
            _ => self.serialized(),
        }
    }

    fn serialized(&self) -> String {
        format!(
            "{{type: {:?}, arn: {:?}, userName: {:?}}}",
            self.identity_type, self.arn, self.user_name
        )
    }
}

/// One parsed organization-trail record.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrailRecord {
    pub event_name: String,
    #[serde(default)]
    pub event_source: Option<String>,
    #[serde(default)]
    pub recipient_account_id: Option<String>,
    #[serde(default)]
    pub user_identity: UserIdentity,
    #[serde(default)]
    pub resources: Vec<TrailResource>,
    #[serde(default)]
    pub request_parameters: Option<Value>,
}

impl TrailRecord {
    /// Parse one log line as a trail record.
    pub fn from_json(line: &str) -> Result<Self, VigilError> {
        serde_json::from_str(line)
            .map_err(|e| VigilError::Decode(format!("malformed trail record: {e}")))
    }

    /// First resource ARN of the given resource type, if present.
    pub fn resource_arn_of_type(&self, resource_type: &str) -> Option<&str> {
        self.resources
            .iter()
            .find(|r| r.resource_type.as_deref() == Some(resource_type))
            .map(|r| r.arn.as_str())
    }

    /// First resource ARN of the given type, else the first resource at all.
    ///
    /// Older trail shapes omit the `type` field, so the typed lookup gets a
    /// positional fallback.
    pub fn resource_arn_or_first(&self, resource_type: &str) -> Option<&str> {
        self.resource_arn_of_type(resource_type)
            .or_else(|| self.resources.first().map(|r| r.arn.as_str()))
    }

    /// The requested secret identifier from `requestParameters.secretId`.
    pub fn requested_secret_id(&self) -> Option<&str> {
        self.request_parameters
            .as_ref()
            .and_then(|p| p.get("secretId"))
            .and_then(|v| v.as_str())
    }
}
