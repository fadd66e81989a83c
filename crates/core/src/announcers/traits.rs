use async_trait::async_trait;

use crate::model::ValidationOutcome;

/// Publishes validated outcomes to downstream consumers.
#[async_trait]
pub trait Announcer: Send + Sync {
    async fn announce(&self, outcome: &ValidationOutcome);
}
