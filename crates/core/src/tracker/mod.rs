//! Status tracking.
//!
//! A [`Tracker`] receives the [`StatusRecord`](crate::model::StatusRecord)s
//! the pipeline emits for every request. [`create_tracker`] puts a buffered
//! channel in front of a tracker and an announcer so emitters never wait on
//! the backing sinks. Status records and announcements share that channel
//! and reach the sinks in the order they were emitted.

mod handle;
mod writer;

pub use handle::TrackerHandle;
pub use writer::{create_tracker, TrackerWriter};

use async_trait::async_trait;

use crate::model::{StatusRecord, ValidationOutcome};

/// Records or forwards status records. Fire-and-forget.
#[async_trait]
pub trait Tracker: Send + Sync {
    async fn status(&self, record: &StatusRecord);
}

/// One queued write.
#[derive(Debug, Clone)]
pub(crate) enum Entry {
    Status(StatusRecord),
    Announcement(ValidationOutcome),
}
