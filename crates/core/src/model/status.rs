use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status codes the pipeline emits for a request.
///
/// A request either follows `processing -> validated -> announced` or
/// `processing -> Rejected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusCode {
    #[serde(rename = "processing")]
    Processing,
    #[serde(rename = "validated")]
    Validated,
    #[serde(rename = "announced")]
    Announced,
    // Mixed case is what the tracking service has always received.
    #[serde(rename = "Rejected")]
    Rejected,
}

impl StatusCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusCode::Processing => "processing",
            StatusCode::Validated => "validated",
            StatusCode::Announced => "announced",
            StatusCode::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A status record sent to the payload tracker. Never modified once sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusRecord {
    pub service: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub account: String,
    pub request_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_id: Option<String>,
    pub status: StatusCode,
    pub status_msg: String,
    pub date: DateTime<Utc>,
}

impl StatusRecord {
    /// Create a record dated now.
    pub fn new(
        service: impl Into<String>,
        account: impl Into<String>,
        request_id: impl Into<String>,
        status: StatusCode,
        status_msg: impl Into<String>,
    ) -> Self {
        Self {
            service: service.into(),
            source: None,
            account: account.into(),
            request_id: request_id.into(),
            inventory_id: None,
            system_id: None,
            status,
            status_msg: status_msg.into(),
            date: Utc::now(),
        }
    }

    pub fn with_inventory_id(mut self, inventory_id: Option<String>) -> Self {
        self.inventory_id = inventory_id;
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_system_id(mut self, system_id: impl Into<String>) -> Self {
        self.system_id = Some(system_id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_wire_names() {
        assert_eq!(
            serde_json::to_string(&StatusCode::Processing).unwrap(),
            "\"processing\""
        );
        assert_eq!(
            serde_json::to_string(&StatusCode::Rejected).unwrap(),
            "\"Rejected\""
        );
        let parsed: StatusCode = serde_json::from_str("\"announced\"").unwrap();
        assert_eq!(parsed, StatusCode::Announced);
    }

    #[test]
    fn test_unknown_status_code_rejected() {
        let result: Result<StatusCode, _> = serde_json::from_str("\"rejected\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_record_skips_absent_optionals() {
        let record = StatusRecord::new("ingress", "A", "r1", StatusCode::Processing, "queued");
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["service"], "ingress");
        assert_eq!(json["status"], "processing");
        assert_eq!(json["status_msg"], "queued");
        assert!(json.get("source").is_none());
        assert!(json.get("inventory_id").is_none());
        assert!(json.get("system_id").is_none());
    }

    #[test]
    fn test_record_round_trip() {
        let record = StatusRecord::new("ingress", "A", "r1", StatusCode::Validated, "ok")
            .with_inventory_id(Some("inv-1".to_string()))
            .with_source("uploader")
            .with_system_id("sys-7");

        let json = serde_json::to_string(&record).unwrap();
        let parsed: StatusRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }
}
