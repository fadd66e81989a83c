//! File system stager implementation.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use super::error::StageError;
use super::traits::Stager;
use super::types::StageInput;

const STAGED_DIR: &str = "staged";
const REJECTED_DIR: &str = "rejected";

/// Stager that keeps payloads under a local directory.
///
/// Staged objects live in `<root>/staged/<key>`; rejected ones are moved to
/// `<root>/rejected/<key>`.
#[derive(Debug, Clone)]
pub struct LocalStager {
    root: PathBuf,
}

impl LocalStager {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn staged_path(&self, key: &str) -> PathBuf {
        self.root.join(STAGED_DIR).join(key)
    }

    fn rejected_path(&self, key: &str) -> PathBuf {
        self.root.join(REJECTED_DIR).join(key)
    }

    fn check_key(key: &str) -> Result<(), StageError> {
        let invalid = key.is_empty()
            || key == "."
            || key == ".."
            || key.contains('/')
            || key.contains('\\');
        if invalid {
            return Err(StageError::InvalidKey {
                key: key.to_string(),
            });
        }
        Ok(())
    }

    fn url_for(path: &Path) -> String {
        format!("file://{}", path.display())
    }
}

#[async_trait]
impl Stager for LocalStager {
    async fn stage(&self, input: &mut StageInput) -> Result<String, StageError> {
        Self::check_key(&input.key)?;

        let path = self.staged_path(&input.key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut file = File::create(&path).await?;
        let written = tokio::io::copy(input.payload_mut(), &mut file).await?;
        file.flush().await?;

        if input.size != 0 && written != input.size {
            warn!(
                key = %input.key,
                declared = input.size,
                written,
                "Staged payload size differs from declared size"
            );
        }
        debug!(key = %input.key, bytes = written, "Payload staged");

        Ok(Self::url_for(&path))
    }

    async fn get_url(&self, request_id: &str) -> Result<String, StageError> {
        Self::check_key(request_id)?;

        let path = self.staged_path(request_id);
        if fs::try_exists(&path).await? {
            Ok(Self::url_for(&path))
        } else {
            Err(StageError::not_found(request_id))
        }
    }

    async fn reject(&self, request_id: &str) {
        if let Err(e) = Self::check_key(request_id) {
            warn!(request_id, error = %e, "Refusing to reject payload");
            return;
        }

        let source = self.staged_path(request_id);
        let destination = self.rejected_path(request_id);

        if let Some(parent) = destination.parent() {
            if let Err(e) = fs::create_dir_all(parent).await {
                warn!(request_id, error = %e, "Failed to create rejected directory");
                return;
            }
        }

        match fs::rename(&source, &destination).await {
            Ok(()) => debug!(request_id, "Staged payload moved to rejected"),
            Err(e) => warn!(request_id, error = %e, "Failed to reject staged payload"),
        }
    }
}
