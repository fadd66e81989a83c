//! Trait definitions for the stage module.

use async_trait::async_trait;

use super::error::StageError;
use super::types::StageInput;

/// Persists payloads and resolves them by request id.
///
/// Implementations must be safe to call from many submissions at once.
#[async_trait]
pub trait Stager: Send + Sync {
    /// Persist the payload and return its retrieval URL.
    async fn stage(&self, input: &mut StageInput) -> Result<String, StageError>;

    /// Resolve the URL of a previously staged payload.
    async fn get_url(&self, request_id: &str) -> Result<String, StageError>;

    /// Discard the staged payload of a rejected request. Best-effort.
    async fn reject(&self, request_id: &str);
}
