use std::sync::Arc;

use tokio::sync::mpsc;

use crate::announcers::Announcer;

use super::{Entry, Tracker, TrackerHandle};

/// Background task forwarding queued entries to the backing sinks.
pub struct TrackerWriter {
    rx: mpsc::Receiver<Entry>,
    sink: Arc<dyn Tracker>,
    announcer: Arc<dyn Announcer>,
}

impl TrackerWriter {
    /// Forward entries until every [`TrackerHandle`] has been dropped.
    ///
    /// Spawn this as a background task.
    pub async fn run(mut self) {
        tracing::info!("Status writer started");

        while let Some(entry) = self.rx.recv().await {
            match entry {
                Entry::Status(record) => self.sink.status(&record).await,
                Entry::Announcement(outcome) => self.announcer.announce(&outcome).await,
            }
        }

        tracing::info!("Status writer shutting down");
    }
}

/// Create a buffered tracker and announcer in front of `sink` and `announcer`.
///
/// Returns the handle to emit through (clone it freely; it implements both
/// [`Tracker`] and [`Announcer`]) and the writer to spawn with
/// `tokio::spawn(writer.run())`. Emitters wait once `buffer_size` entries are
/// queued.
pub fn create_tracker(
    sink: Arc<dyn Tracker>,
    announcer: Arc<dyn Announcer>,
    buffer_size: usize,
) -> (TrackerHandle, TrackerWriter) {
    let (tx, rx) = mpsc::channel(buffer_size);
    (
        TrackerHandle::new(tx),
        TrackerWriter {
            rx,
            sink,
            announcer,
        },
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::model::{StatusCode, StatusRecord, ValidationOutcome, ValidationRequest, Verdict};

    /// Records status codes and announcements in arrival order.
    #[derive(Default)]
    struct MemorySink {
        events: Mutex<Vec<String>>,
    }

    impl MemorySink {
        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Tracker for MemorySink {
        async fn status(&self, record: &StatusRecord) {
            self.events
                .lock()
                .unwrap()
                .push(record.status.as_str().to_string());
        }
    }

    #[async_trait]
    impl Announcer for MemorySink {
        async fn announce(&self, outcome: &ValidationOutcome) {
            // A slow announcer must not let later statuses overtake it
            tokio::time::sleep(Duration::from_millis(10)).await;
            self.events
                .lock()
                .unwrap()
                .push(format!("announce:{}", outcome.request_id));
        }
    }

    fn record(status: StatusCode) -> StatusRecord {
        StatusRecord::new("ingress", "A", "r1", status, "test")
    }

    fn writer_for(sink: &Arc<MemorySink>) -> (TrackerHandle, TrackerWriter) {
        create_tracker(
            Arc::clone(sink) as Arc<dyn Tracker>,
            Arc::clone(sink) as Arc<dyn Announcer>,
            10,
        )
    }

    #[tokio::test]
    async fn test_writer_forwards_in_order() {
        let sink = Arc::new(MemorySink::default());
        let (handle, writer) = writer_for(&sink);
        let writer_handle = tokio::spawn(writer.run());
        let request = ValidationRequest::new("r1", "A", "advisor", "compliance");

        handle.emit(record(StatusCode::Processing)).await;
        handle.emit(record(StatusCode::Validated)).await;
        handle
            .announce(&ValidationOutcome::from_request(&request, Verdict::Success))
            .await;
        handle.emit(record(StatusCode::Announced)).await;
        drop(handle);

        writer_handle.await.unwrap();
        assert_eq!(
            sink.events(),
            vec!["processing", "validated", "announce:r1", "announced"]
        );
    }

    #[tokio::test]
    async fn test_writer_waits_for_all_handles_to_drop() {
        let sink = Arc::new(MemorySink::default());
        let (handle, writer) = writer_for(&sink);
        let other = handle.clone();
        let writer_handle = tokio::spawn(writer.run());

        handle.emit(record(StatusCode::Processing)).await;
        drop(handle);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(
            !writer_handle.is_finished(),
            "Writer should still be running with handles alive"
        );

        other.emit(record(StatusCode::Rejected)).await;
        drop(other);

        let result = tokio::time::timeout(Duration::from_secs(1), writer_handle).await;
        assert!(result.is_ok(), "Writer should exit after all handles dropped");
        assert_eq!(sink.events(), vec!["processing", "Rejected"]);
    }
}
