//! Testing utilities and mock collaborators.
//!
//! The mocks share a [`CallLog`] so a test can assert the order of calls
//! across stager, validator, announcer and tracker.
//!
//! # Example
//!
//! ```rust,ignore
//! use ingress_core::testing::{CallLog, MockStager, MockValidator, RecordingAnnouncer};
//!
//! let log = CallLog::new();
//! let stager = MockStager::new(log.clone());
//! let announcer = RecordingAnnouncer::new(log.clone());
//!
//! // ... run the pipeline ...
//!
//! assert_eq!(
//!     log.statuses_for("r1"),
//!     vec![StatusCode::Processing, StatusCode::Validated, StatusCode::Announced],
//! );
//! ```

mod mock_announcer;
mod mock_stager;
mod mock_validator;

pub use mock_announcer::RecordingAnnouncer;
pub use mock_stager::MockStager;
pub use mock_validator::MockValidator;

use std::sync::{Arc, Mutex, PoisonError};

use crate::model::StatusCode;

/// A collaborator call observed by a mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Stage { key: String },
    GetUrl { request_id: String },
    Reject { request_id: String },
    Validate { request_id: String, url: Option<String> },
    ValidateService { service: String, category: String },
    Announce { request_id: String },
    Status { request_id: String, status: StatusCode },
}

impl Call {
    /// The request this call concerns, if any.
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Call::Stage { key } => Some(key),
            Call::GetUrl { request_id }
            | Call::Reject { request_id }
            | Call::Validate { request_id, .. }
            | Call::Announce { request_id }
            | Call::Status { request_id, .. } => Some(request_id),
            Call::ValidateService { .. } => None,
        }
    }
}

/// Shared, ordered record of collaborator calls.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<Call>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, call: Call) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }

    /// All calls in the order they happened.
    pub fn calls(&self) -> Vec<Call> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Calls concerning one request, in order.
    pub fn for_request(&self, request_id: &str) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| c.request_id() == Some(request_id))
            .collect()
    }

    /// Status codes tracked for one request, in order.
    pub fn statuses_for(&self, request_id: &str) -> Vec<StatusCode> {
        self.for_request(request_id)
            .into_iter()
            .filter_map(|c| match c {
                Call::Status { status, .. } => Some(status),
                _ => None,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::model::{ValidationOutcome, ValidationRequest, Verdict};
    use crate::stage::StageInput;

    /// A request for the `advisor` service with reasonable defaults.
    pub fn request(request_id: &str, account: &str) -> ValidationRequest {
        ValidationRequest::new(request_id, account, "advisor", "compliance")
            .with_principal("org-1")
            .with_size(7)
            .with_b64_identity("eyJpZGVudGl0eSI6e319")
    }

    /// A small in-memory payload keyed by `request_id`.
    pub fn payload(request_id: &str, account: &str) -> StageInput {
        StageInput::from_bytes(request_id, account, b"payload".to_vec())
    }

    /// An outcome for `request_id` with the given verdict.
    pub fn outcome(request_id: &str, account: &str, verdict: Verdict) -> ValidationOutcome {
        ValidationOutcome::from_request(&request(request_id, account), verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_log_filters_by_request() {
        let log = CallLog::new();
        log.push(Call::Stage {
            key: "r1".to_string(),
        });
        log.push(Call::Status {
            request_id: "r2".to_string(),
            status: StatusCode::Processing,
        });
        log.push(Call::Status {
            request_id: "r1".to_string(),
            status: StatusCode::Processing,
        });

        assert_eq!(log.len(), 3);
        assert_eq!(log.for_request("r1").len(), 2);
        assert_eq!(log.statuses_for("r1"), vec![StatusCode::Processing]);

        log.clear();
        assert!(log.is_empty());
    }
}
