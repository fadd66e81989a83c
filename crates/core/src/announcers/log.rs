use async_trait::async_trait;
use tracing::info;

use crate::model::{StatusRecord, ValidationOutcome};
use crate::tracker::Tracker;

use super::traits::Announcer;

/// Announces outcomes and status records as structured log events.
#[derive(Debug, Clone, Default)]
pub struct LogAnnouncer;

impl LogAnnouncer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Announcer for LogAnnouncer {
    async fn announce(&self, outcome: &ValidationOutcome) {
        info!(
            target: "ingress::announce",
            request_id = %outcome.request_id,
            account = %outcome.account,
            service = %outcome.service,
            url = outcome.url.as_deref().unwrap_or_default(),
            "Payload announced"
        );
    }
}

#[async_trait]
impl Tracker for LogAnnouncer {
    async fn status(&self, record: &StatusRecord) {
        info!(
            target: "ingress::status",
            request_id = %record.request_id,
            account = %record.account,
            status = %record.status,
            inventory_id = record.inventory_id.as_deref().unwrap_or_default(),
            "{}",
            record.status_msg
        );
    }
}
