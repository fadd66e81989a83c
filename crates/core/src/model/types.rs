use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Client-supplied metadata attached to a payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ip_addresses: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insights_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub machine_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_manager_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mac_addresses: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fqdn: Option<String>,
}

/// One inbound unit of work, sent to the validation service for each payload.
///
/// `request_id` is the correlation key used by every downstream message and is
/// never changed after the request is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationRequest {
    pub account: String,
    pub category: String,
    #[serde(default)]
    pub metadata: Metadata,
    pub request_id: String,
    pub principal: String,
    pub service: String,
    pub size: u64,
    /// Retrieval URL of the staged payload, set during submission.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// External inventory id.
    #[serde(default, rename = "id", skip_serializing_if = "Option::is_none")]
    pub inventory_id: Option<String>,
    pub b64_identity: String,
    /// Submission time, set during submission.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl ValidationRequest {
    /// Create a request with the required identity fields; everything else
    /// starts empty.
    pub fn new(
        request_id: impl Into<String>,
        account: impl Into<String>,
        service: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            account: account.into(),
            category: category.into(),
            metadata: Metadata::default(),
            request_id: request_id.into(),
            principal: String::new(),
            service: service.into(),
            size: 0,
            url: None,
            inventory_id: None,
            b64_identity: String::new(),
            timestamp: None,
        }
    }

    pub fn with_principal(mut self, principal: impl Into<String>) -> Self {
        self.principal = principal.into();
        self
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    pub fn with_b64_identity(mut self, identity: impl Into<String>) -> Self {
        self.b64_identity = identity.into();
        self
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Verdict reported by the validation service.
///
/// Only `success` and `failure` drive the pipeline; any other value is kept
/// verbatim so foreign verdicts survive a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Verdict {
    Success,
    Failure,
    Other(String),
}

impl Verdict {
    pub fn as_str(&self) -> &str {
        match self {
            Verdict::Success => "success",
            Verdict::Failure => "failure",
            Verdict::Other(s) => s,
        }
    }
}

impl From<String> for Verdict {
    fn from(value: String) -> Self {
        match value.as_str() {
            "success" => Verdict::Success,
            "failure" => Verdict::Failure,
            _ => Verdict::Other(value),
        }
    }
}

impl From<Verdict> for String {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Asynchronous result of validating one [`ValidationRequest`].
///
/// Delivered exactly once, on either the valid or the invalid outcome channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub account: String,
    pub validation: Verdict,
    pub request_id: String,
    pub principal: String,
    pub service: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub b64_identity: String,
    #[serde(default, rename = "id", skip_serializing_if = "Option::is_none")]
    pub inventory_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub satellite_managed: Option<bool>,
    /// Verdict-specific detail.
    #[serde(default)]
    pub extras: HashMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl ValidationOutcome {
    /// Build an outcome that mirrors the identity fields of `request`.
    pub fn from_request(request: &ValidationRequest, validation: Verdict) -> Self {
        Self {
            account: request.account.clone(),
            validation,
            request_id: request.request_id.clone(),
            principal: request.principal.clone(),
            service: request.service.clone(),
            url: request.url.clone(),
            b64_identity: request.b64_identity.clone(),
            inventory_id: request.inventory_id.clone(),
            satellite_managed: None,
            extras: HashMap::new(),
            timestamp: request.timestamp,
        }
    }
}

/// A (service, category) pairing checked before a request is admitted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    pub service: String,
    pub category: String,
}

impl ServiceDescriptor {
    pub fn new(service: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            category: category.into(),
        }
    }
}

impl fmt::Display for ServiceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.service, self.category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_from_known_strings() {
        assert_eq!(Verdict::from("success".to_string()), Verdict::Success);
        assert_eq!(Verdict::from("failure".to_string()), Verdict::Failure);
        assert_eq!(
            Verdict::from("handoff".to_string()),
            Verdict::Other("handoff".to_string())
        );
    }

    #[test]
    fn test_request_omits_absent_optionals() {
        let request = ValidationRequest::new("r1", "A", "advisor", "compliance");
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["request_id"], "r1");
        assert_eq!(json["account"], "A");
        assert!(json.get("url").is_none());
        assert!(json.get("id").is_none());
        assert!(json.get("timestamp").is_none());
    }

    #[test]
    fn test_request_round_trip_with_all_fields() {
        let mut request = ValidationRequest::new("r1", "A", "advisor", "compliance")
            .with_principal("org-1")
            .with_size(2048)
            .with_b64_identity("eyJpZCI6MX0=")
            .with_metadata(Metadata {
                ip_addresses: vec!["10.0.0.1".to_string()],
                fqdn: Some("host.example.com".to_string()),
                ..Default::default()
            });
        request.url = Some("file:///stage/r1".to_string());
        request.inventory_id = Some("1234-abcd".to_string());
        request.timestamp = Some(Utc::now());

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"id\":\"1234-abcd\""));

        let parsed: ValidationRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, request);
    }

    #[test]
    fn test_outcome_verdict_serializes_as_plain_string() {
        let request = ValidationRequest::new("r2", "A", "advisor", "compliance");
        let outcome = ValidationOutcome::from_request(&request, Verdict::Failure);

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["validation"], "failure");
        assert!(json.get("satellite_managed").is_none());
    }

    #[test]
    fn test_outcome_parses_foreign_payload() {
        let json = r#"{
            "account": "A",
            "validation": "success",
            "request_id": "r1",
            "principal": "org-1",
            "service": "advisor",
            "url": "file:///stage/r1",
            "b64_identity": "",
            "id": "inv-9",
            "satellite_managed": true,
            "extras": {"reason": "ok", "score": 3}
        }"#;

        let outcome: ValidationOutcome = serde_json::from_str(json).unwrap();
        assert_eq!(outcome.validation, Verdict::Success);
        assert_eq!(outcome.inventory_id.as_deref(), Some("inv-9"));
        assert_eq!(outcome.satellite_managed, Some(true));
        assert_eq!(outcome.extras["score"], serde_json::json!(3));
        assert!(outcome.timestamp.is_none());
    }

    #[test]
    fn test_from_request_mirrors_identity() {
        let mut request = ValidationRequest::new("r1", "A", "advisor", "compliance")
            .with_principal("org-1")
            .with_b64_identity("id");
        request.url = Some("file:///stage/r1".to_string());

        let outcome = ValidationOutcome::from_request(&request, Verdict::Success);
        assert_eq!(outcome.request_id, "r1");
        assert_eq!(outcome.principal, "org-1");
        assert_eq!(outcome.url.as_deref(), Some("file:///stage/r1"));
        assert_eq!(outcome.b64_identity, "id");
    }

    #[test]
    fn test_service_descriptor_display() {
        let descriptor = ServiceDescriptor::new("advisor", "compliance");
        assert_eq!(descriptor.to_string(), "advisor/compliance");
    }
}
