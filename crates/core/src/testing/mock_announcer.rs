//! Recording announcer and tracker for testing.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::announcers::Announcer;
use crate::model::{StatusRecord, ValidationOutcome};
use crate::tracker::Tracker;

use super::{Call, CallLog};

/// Announcer and tracker that remembers everything it receives.
#[derive(Debug, Clone)]
pub struct RecordingAnnouncer {
    log: CallLog,
    announcements: Arc<RwLock<Vec<ValidationOutcome>>>,
    records: Arc<RwLock<Vec<StatusRecord>>>,
}

impl RecordingAnnouncer {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            announcements: Arc::new(RwLock::new(Vec::new())),
            records: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub async fn announcements(&self) -> Vec<ValidationOutcome> {
        self.announcements.read().await.clone()
    }

    pub async fn records(&self) -> Vec<StatusRecord> {
        self.records.read().await.clone()
    }

    pub async fn records_for(&self, request_id: &str) -> Vec<StatusRecord> {
        self.records
            .read()
            .await
            .iter()
            .filter(|r| r.request_id == request_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl Announcer for RecordingAnnouncer {
    async fn announce(&self, outcome: &ValidationOutcome) {
        self.log.push(Call::Announce {
            request_id: outcome.request_id.clone(),
        });
        self.announcements.write().await.push(outcome.clone());
    }
}

#[async_trait]
impl Tracker for RecordingAnnouncer {
    async fn status(&self, record: &StatusRecord) {
        self.log.push(Call::Status {
            request_id: record.request_id.clone(),
            status: record.status,
        });
        self.records.write().await.push(record.clone());
    }
}
