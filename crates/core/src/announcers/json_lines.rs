//! Announcer that appends JSON lines to a file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::error;

use crate::model::{StatusRecord, ValidationOutcome};
use crate::tracker::Tracker;

use super::traits::Announcer;

#[derive(Serialize)]
#[serde(tag = "kind", content = "body", rename_all = "snake_case")]
enum Line<'a> {
    Announcement(&'a ValidationOutcome),
    Status(&'a StatusRecord),
}

/// Appends each announcement or status record to a file as one JSON object
/// per line. Write failures are logged and never reach the caller.
pub struct JsonLinesAnnouncer {
    path: PathBuf,
    file: Mutex<File>,
}

impl JsonLinesAnnouncer {
    /// Open `path` for appending, creating it if needed.
    pub async fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn append(&self, line: Line<'_>) {
        let mut bytes = match serde_json::to_vec(&line) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!("Failed to serialize line for {:?}: {}", self.path, e);
                return;
            }
        };
        bytes.push(b'\n');

        let mut file = self.file.lock().await;
        if let Err(e) = file.write_all(&bytes).await {
            error!("Failed to append to {:?}: {}", self.path, e);
            return;
        }
        if let Err(e) = file.flush().await {
            error!("Failed to flush {:?}: {}", self.path, e);
        }
    }
}

#[async_trait]
impl Announcer for JsonLinesAnnouncer {
    async fn announce(&self, outcome: &ValidationOutcome) {
        self.append(Line::Announcement(outcome)).await;
    }
}

#[async_trait]
impl Tracker for JsonLinesAnnouncer {
    async fn status(&self, record: &StatusRecord) {
        self.append(Line::Status(record)).await;
    }
}
