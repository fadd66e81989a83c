//! Mock validator for testing.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::model::{ServiceDescriptor, ValidationOutcome, ValidationRequest, Verdict};
use crate::validators::{OutcomeSender, Validator, ValidatorError};

use super::{Call, CallLog};

/// Mock implementation of the Validator trait.
///
/// Records every request. When a responder is configured, each request is
/// answered immediately with an outcome carrying the configured verdict.
#[derive(Debug, Clone)]
pub struct MockValidator {
    log: CallLog,
    requests: Arc<RwLock<Vec<ValidationRequest>>>,
    responder: Arc<RwLock<Option<(OutcomeSender, Verdict)>>>,
    rejected_services: Arc<HashSet<String>>,
}

impl MockValidator {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            requests: Arc::new(RwLock::new(Vec::new())),
            responder: Arc::new(RwLock::new(None)),
            rejected_services: Arc::new(HashSet::new()),
        }
    }

    /// Refuse `service` in `validate_service`.
    pub fn with_rejected_service(mut self, service: impl Into<String>) -> Self {
        let mut services = (*self.rejected_services).clone();
        services.insert(service.into());
        self.rejected_services = Arc::new(services);
        self
    }

    /// Answer every later request with `verdict` on `sender`.
    pub async fn respond_with(&self, sender: OutcomeSender, verdict: Verdict) {
        *self.responder.write().await = Some((sender, verdict));
    }

    /// Get all recorded requests.
    pub async fn recorded_requests(&self) -> Vec<ValidationRequest> {
        self.requests.read().await.clone()
    }

    pub async fn request_count(&self) -> usize {
        self.requests.read().await.len()
    }
}

#[async_trait]
impl Validator for MockValidator {
    async fn validate(&self, request: ValidationRequest) {
        self.log.push(Call::Validate {
            request_id: request.request_id.clone(),
            url: request.url.clone(),
        });

        let responder = self.responder.read().await.clone();
        if let Some((sender, verdict)) = responder {
            let outcome = ValidationOutcome::from_request(&request, verdict);
            if let Err(e) = sender.deliver(outcome).await {
                tracing::warn!("Mock validator failed to deliver outcome: {}", e);
            }
        }

        self.requests.write().await.push(request);
    }

    fn validate_service(&self, service: &ServiceDescriptor) -> Result<(), ValidatorError> {
        self.log.push(Call::ValidateService {
            service: service.service.clone(),
            category: service.category.clone(),
        });

        if self.rejected_services.contains(&service.service) {
            return Err(ValidatorError::UnknownService(service.service.clone()));
        }
        Ok(())
    }
}
