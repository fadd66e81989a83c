use async_trait::async_trait;

use crate::model::{ServiceDescriptor, ValidationRequest};

use super::error::ValidatorError;

/// Hands requests to a validation service.
#[async_trait]
pub trait Validator: Send + Sync {
    /// Enqueue validation of `request`.
    ///
    /// Returns once the request is queued; the verdict arrives later on the
    /// outcome channels.
    async fn validate(&self, request: ValidationRequest);

    /// Check that a (service, category) pairing may be submitted.
    fn validate_service(&self, service: &ServiceDescriptor) -> Result<(), ValidatorError>;
}
