//! Pipeline controller implementation.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::announcers::Announcer;
use crate::inventory::Inventory;
use crate::metrics;
use crate::model::{
    ServiceDescriptor, StatusCode, StatusRecord, ValidationOutcome, ValidationRequest,
};
use crate::stage::{StageInput, Stager};
use crate::tracker::Tracker;
use crate::validators::{OutcomeEvent, OutcomeReceiver, Validator, ValidatorError};

/// Service name used on status records unless configured otherwise.
pub const DEFAULT_SERVICE_NAME: &str = "ingress";

/// The external services the pipeline drives.
///
/// Every collaborator may be called from many submissions at once and must be
/// safe for that.
#[derive(Clone)]
pub struct Collaborators {
    pub stager: Arc<dyn Stager>,
    pub validator: Arc<dyn Validator>,
    pub announcer: Arc<dyn Announcer>,
    pub tracker: Arc<dyn Tracker>,
    pub inventory: Option<Arc<dyn Inventory>>,
}

struct Shared {
    collaborators: Collaborators,
    service_name: String,
}

impl Shared {
    fn record(
        &self,
        account: &str,
        request_id: &str,
        status: StatusCode,
        message: &str,
    ) -> StatusRecord {
        StatusRecord::new(&self.service_name, account, request_id, status, message)
    }

    async fn submit(&self, mut input: StageInput, mut request: ValidationRequest) {
        let c = &self.collaborators;

        let start = Instant::now();
        let staged = c.stager.stage(&mut input).await;
        metrics::STAGE_ELAPSED.observe(start.elapsed().as_secs_f64());

        let url = match staged {
            Ok(url) => url,
            Err(e) => {
                error!(key = %input.key, error = %e, "Error staging");
                metrics::SUBMISSIONS.with_label_values(&["stage_failed"]).inc();
                return;
            }
        };
        drop(input);
        metrics::SUBMISSIONS.with_label_values(&["staged"]).inc();

        request.url = Some(url);
        request.timestamp = Some(Utc::now());

        if request.inventory_id.is_none() {
            if let Some(inventory) = &c.inventory {
                match inventory.get_id(&request).await {
                    Ok(id) => request.inventory_id = Some(id),
                    Err(e) => warn!(
                        request_id = %request.request_id,
                        error = %e,
                        "Inventory lookup failed"
                    ),
                }
            }
        }

        let record = self.record(
            &request.account,
            &request.request_id,
            StatusCode::Processing,
            "Sent to validation service",
        );
        info!(request_id = %request.request_id, "Payload sent to validation service");
        c.tracker.status(&record).await;
        c.validator.validate(request).await;
    }

    async fn handle_valid(&self, mut ev: ValidationOutcome) {
        let c = &self.collaborators;

        let url = match c.stager.get_url(&ev.request_id).await {
            Ok(url) => url,
            Err(e) => {
                error!(request_id = %ev.request_id, error = %e, "Failed to get URL");
                metrics::OUTCOMES.with_label_values(&["unresolved"]).inc();
                return;
            }
        };
        ev.url = Some(url);

        let mut record = self
            .record(
                &ev.account,
                &ev.request_id,
                StatusCode::Validated,
                "Payload validated by service",
            )
            .with_inventory_id(ev.inventory_id.clone());
        info!(request_id = %ev.request_id, "Validation status received for payload");
        c.tracker.status(&record).await;

        c.announcer.announce(&ev).await;

        record.status = StatusCode::Announced;
        record.status_msg = "Announced to platform".to_string();
        record.date = Utc::now();
        c.tracker.status(&record).await;

        metrics::OUTCOMES.with_label_values(&["validated"]).inc();
    }

    async fn handle_invalid(&self, iev: ValidationOutcome) {
        let c = &self.collaborators;

        let record = self.record(
            &iev.account,
            &iev.request_id,
            StatusCode::Rejected,
            "Payload not valid. rejecting",
        );
        info!(request_id = %iev.request_id, "Rejecting invalid payload");
        c.tracker.status(&record).await;
        c.stager.reject(&iev.request_id).await;

        metrics::OUTCOMES.with_label_values(&["rejected"]).inc();
    }
}

/// Cloneable submission side of a [`Pipeline`].
///
/// Remains usable while the pipeline itself is owned by its event loop.
#[derive(Clone)]
pub struct PipelineHandle {
    shared: Arc<Shared>,
}

impl PipelineHandle {
    /// Stage a payload and send its request to validation.
    ///
    /// The payload is released before this returns. If staging fails the
    /// request is dropped: nothing is tracked and the validator is not called.
    pub async fn submit(&self, input: StageInput, request: ValidationRequest) {
        self.shared.submit(input, request).await;
    }

    /// Check a (service, category) pairing before accepting a payload for it.
    pub fn admit(&self, service: &ServiceDescriptor) -> Result<(), ValidatorError> {
        self.shared.collaborators.validator.validate_service(service)
    }

    pub fn service_name(&self) -> &str {
        &self.shared.service_name
    }
}

/// The pipeline controller.
///
/// Owns the receiving end of the outcome channels; exactly one event loop
/// ([`Pipeline::start`]) should run per process.
pub struct Pipeline {
    shared: Arc<Shared>,
    outcomes: OutcomeReceiver,
    cancel: CancellationToken,
}

impl Pipeline {
    pub fn new(
        collaborators: Collaborators,
        outcomes: OutcomeReceiver,
        cancel: CancellationToken,
    ) -> Self {
        Self::with_service_name(collaborators, outcomes, cancel, DEFAULT_SERVICE_NAME)
    }

    pub fn with_service_name(
        collaborators: Collaborators,
        outcomes: OutcomeReceiver,
        cancel: CancellationToken,
        service_name: impl Into<String>,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                collaborators,
                service_name: service_name.into(),
            }),
            outcomes,
            cancel,
        }
    }

    pub fn handle(&self) -> PipelineHandle {
        PipelineHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    /// See [`PipelineHandle::submit`].
    pub async fn submit(&self, input: StageInput, request: ValidationRequest) {
        self.shared.submit(input, request).await;
    }

    /// See [`PipelineHandle::admit`].
    pub fn admit(&self, service: &ServiceDescriptor) -> Result<(), ValidatorError> {
        self.handle().admit(service)
    }

    /// Handle one outcome.
    ///
    /// Waits for a valid outcome, an invalid outcome, a closed channel or
    /// cancellation. Returns false on the last two. Cancellation wins over
    /// pending outcomes, which stay unread.
    pub async fn tick(&mut self) -> bool {
        let event = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                debug!("Pipeline cancelled");
                return false;
            }
            event = self.outcomes.next() => event,
        };

        match event {
            OutcomeEvent::Valid(ev) => self.shared.handle_valid(ev).await,
            OutcomeEvent::Invalid(iev) => self.shared.handle_invalid(iev).await,
            OutcomeEvent::Closed => {
                debug!("Outcome channel closed");
                return false;
            }
        }
        true
    }

    /// Run [`tick`](Self::tick) until it returns false, then signal `done`.
    pub async fn start(mut self, done: oneshot::Sender<()>) {
        info!("Pipeline event loop started");
        while self.tick().await {}
        info!("Tick returned false, signalling completion");
        let _ = done.send(());
    }
}
