use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::announcers::Announcer;
use crate::model::{StatusRecord, ValidationOutcome};

use super::{Entry, Tracker};

/// Handle for emitting status records and announcements.
///
/// Cheaply cloneable and shareable across tasks. Entries are queued on a
/// channel and written by the [`TrackerWriter`](super::TrackerWriter) in the
/// order they were emitted.
#[derive(Clone)]
pub struct TrackerHandle {
    tx: mpsc::Sender<Entry>,
}

impl TrackerHandle {
    pub(crate) fn new(tx: mpsc::Sender<Entry>) -> Self {
        Self { tx }
    }

    /// Queue a record, waiting for buffer space.
    ///
    /// If the writer is gone the error is logged and the record dropped.
    pub async fn emit(&self, record: StatusRecord) {
        self.send(Entry::Status(record)).await;
    }

    async fn send(&self, entry: Entry) {
        if let Err(e) = self.tx.send(entry).await {
            tracing::error!("Failed to queue {:?}: writer is gone", e.0);
        }
    }
}

#[async_trait]
impl Tracker for TrackerHandle {
    async fn status(&self, record: &StatusRecord) {
        self.emit(record.clone()).await;
    }
}

#[async_trait]
impl Announcer for TrackerHandle {
    async fn announce(&self, outcome: &ValidationOutcome) {
        self.send(Entry::Announcement(outcome.clone())).await;
    }
}
