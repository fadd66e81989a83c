//! Mock stager for testing.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::AsyncReadExt;
use tokio::sync::RwLock;

use crate::stage::{StageError, StageInput, Stager};

use super::{Call, CallLog};

/// Mock implementation of the Stager trait.
///
/// Keeps staged URLs in memory under `mock://staging/<key>`. Failures can be
/// injected for the next `stage` call and for every `get_url` call.
#[derive(Debug, Clone)]
pub struct MockStager {
    log: CallLog,
    urls: Arc<RwLock<HashMap<String, String>>>,
    payloads: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    next_stage_error: Arc<RwLock<Option<StageError>>>,
    fail_get_url: Arc<RwLock<bool>>,
}

impl MockStager {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            urls: Arc::new(RwLock::new(HashMap::new())),
            payloads: Arc::new(RwLock::new(HashMap::new())),
            next_stage_error: Arc::new(RwLock::new(None)),
            fail_get_url: Arc::new(RwLock::new(false)),
        }
    }

    /// Configure the next `stage` call to fail with the given error.
    pub async fn set_next_stage_error(&self, error: StageError) {
        *self.next_stage_error.write().await = Some(error);
    }

    /// Make every `get_url` call fail.
    pub async fn set_fail_get_url(&self, fail: bool) {
        *self.fail_get_url.write().await = fail;
    }

    /// Pretend `request_id` was staged at `url`.
    pub async fn insert_url(&self, request_id: &str, url: &str) {
        self.urls
            .write()
            .await
            .insert(request_id.to_string(), url.to_string());
    }

    /// Whether `request_id` is currently staged.
    pub async fn is_staged(&self, request_id: &str) -> bool {
        self.urls.read().await.contains_key(request_id)
    }

    /// Bytes read from the payload staged under `key`.
    pub async fn staged_payload(&self, key: &str) -> Option<Vec<u8>> {
        self.payloads.read().await.get(key).cloned()
    }
}

#[async_trait]
impl Stager for MockStager {
    async fn stage(&self, input: &mut StageInput) -> Result<String, StageError> {
        self.log.push(Call::Stage {
            key: input.key.clone(),
        });

        if let Some(err) = self.next_stage_error.write().await.take() {
            return Err(err);
        }

        let mut bytes = Vec::new();
        input.payload_mut().read_to_end(&mut bytes).await?;

        let url = format!("mock://staging/{}", input.key);
        self.urls.write().await.insert(input.key.clone(), url.clone());
        self.payloads.write().await.insert(input.key.clone(), bytes);
        Ok(url)
    }

    async fn get_url(&self, request_id: &str) -> Result<String, StageError> {
        self.log.push(Call::GetUrl {
            request_id: request_id.to_string(),
        });

        if *self.fail_get_url.read().await {
            return Err(StageError::Backend("mock get_url failure".to_string()));
        }

        self.urls
            .read()
            .await
            .get(request_id)
            .cloned()
            .ok_or_else(|| StageError::not_found(request_id))
    }

    async fn reject(&self, request_id: &str) {
        self.log.push(Call::Reject {
            request_id: request_id.to_string(),
        });
        self.urls.write().await.remove(request_id);
        self.payloads.write().await.remove(request_id);
    }
}
