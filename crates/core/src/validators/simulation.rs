//! Simulated validation service for local runs and demos.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::model::{ServiceDescriptor, ValidationOutcome, ValidationRequest, Verdict};

use super::channels::OutcomeSender;
use super::error::ValidatorError;
use super::registry::ServiceRegistry;
use super::traits::Validator;

/// Configuration for the simulated validator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Time between a request being enqueued and its outcome (milliseconds).
    #[serde(default = "default_delay")]
    pub delay_ms: u64,

    /// Time `validate` itself takes before returning (milliseconds).
    #[serde(default)]
    pub call_delay_ms: u64,

    /// Verdict every simulated outcome carries.
    #[serde(default = "default_verdict")]
    pub verdict: Verdict,
}

fn default_delay() -> u64 {
    1000
}

fn default_verdict() -> Verdict {
    Verdict::Success
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_delay(),
            call_delay_ms: 0,
            verdict: default_verdict(),
        }
    }
}

/// Validator that answers every request with a fixed verdict after a delay.
///
/// When the cancellation token fires, pending simulations are abandoned and
/// the validator releases its outcome sender, so the outcome channels close
/// once no other producer holds one.
pub struct SimulationValidator {
    config: SimulationConfig,
    registry: ServiceRegistry,
    sender: Arc<Mutex<Option<OutcomeSender>>>,
    cancel: CancellationToken,
}

impl SimulationValidator {
    /// Create the validator. Must be called inside a tokio runtime.
    pub fn new(
        config: SimulationConfig,
        registry: ServiceRegistry,
        sender: OutcomeSender,
        cancel: CancellationToken,
    ) -> Self {
        let sender = Arc::new(Mutex::new(Some(sender)));

        let slot = Arc::clone(&sender);
        let token = cancel.clone();
        tokio::spawn(async move {
            token.cancelled().await;
            info!("Simulation validator requested to stop");
            slot.lock().await.take();
        });

        Self {
            config,
            registry,
            sender,
            cancel,
        }
    }
}

#[async_trait]
impl Validator for SimulationValidator {
    async fn validate(&self, request: ValidationRequest) {
        let Some(sender) = self.sender.lock().await.clone() else {
            warn!(request_id = %request.request_id, "Simulation validator stopped, dropping request");
            return;
        };

        let delay = Duration::from_millis(self.config.delay_ms);
        let outcome = ValidationOutcome::from_request(&request, self.config.verdict.clone());
        let cancel = self.cancel.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!(request_id = %outcome.request_id, "Requested to stop, bailing");
                    return;
                }
                _ = tokio::time::sleep(delay) => {}
            }

            let request_id = outcome.request_id.clone();
            match sender.deliver(outcome).await {
                Ok(()) => debug!(request_id = %request_id, "Simulated outcome delivered"),
                Err(e) => warn!(request_id = %request_id, error = %e, "Failed to deliver simulated outcome"),
            }
        });

        if self.config.call_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.call_delay_ms)).await;
        }
    }

    fn validate_service(&self, service: &ServiceDescriptor) -> Result<(), ValidatorError> {
        self.registry.check(service)
    }
}
