//! Data shapes exchanged between the pipeline and its collaborators.
//!
//! These types are the serialization contract exposed to whichever transport
//! carries requests, outcomes and status records. Field names follow the wire
//! names used by the validation and tracking services.

mod status;
mod types;

pub use status::{StatusCode, StatusRecord};
pub use types::{Metadata, ServiceDescriptor, ValidationOutcome, ValidationRequest, Verdict};
