//! Asynchronous validation.
//!
//! A [`Validator`] accepts a [`ValidationRequest`](crate::model::ValidationRequest)
//! and, some time later, delivers a [`ValidationOutcome`](crate::model::ValidationOutcome)
//! through an [`OutcomeSender`]. Successful outcomes travel on the valid
//! channel, failures on the invalid channel; the pipeline owns the single
//! [`OutcomeReceiver`] that drains both.
//!
//! The channels are bounded. When the pipeline falls behind, validators block
//! on delivery, which is the only backpressure in the system.

mod channels;
mod error;
mod registry;
mod simulation;
mod traits;

pub use channels::{outcome_channels, OutcomeEvent, OutcomeReceiver, OutcomeSender};
pub use error::{DeliveryError, ValidatorError};
pub use registry::ServiceRegistry;
pub use simulation::{SimulationConfig, SimulationValidator};
pub use traits::Validator;
