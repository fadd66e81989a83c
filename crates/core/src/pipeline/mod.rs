//! Pipeline controller.
//!
//! The controller ties the collaborators together:
//! - **Submission** ([`PipelineHandle::submit`]): stage the payload, emit
//!   `processing`, hand the request to the validator. Callable concurrently.
//! - **Event loop** ([`Pipeline::tick`] / [`Pipeline::start`]): the single
//!   consumer of the outcome channels. Valid outcomes are announced
//!   (`validated`, then `announced`); invalid ones are rejected (`Rejected`)
//!   and their staged payload discarded.
//!
//! # Example
//!
//! ```ignore
//! use ingress_core::pipeline::{Collaborators, Pipeline};
//! use ingress_core::validators::outcome_channels;
//!
//! let (outcome_tx, outcome_rx) = outcome_channels(100);
//! let cancel = CancellationToken::new();
//! // ... build the validator around `outcome_tx` ...
//! let pipeline = Pipeline::new(collaborators, outcome_rx, cancel.clone());
//! let handle = pipeline.handle();
//!
//! let (done_tx, done_rx) = tokio::sync::oneshot::channel();
//! tokio::spawn(pipeline.start(done_tx));
//!
//! handle.submit(input, request).await;
//!
//! cancel.cancel();
//! done_rx.await?;
//! ```

mod config;
mod controller;

pub use config::PipelineConfig;
pub use controller::{Collaborators, Pipeline, PipelineHandle, DEFAULT_SERVICE_NAME};
