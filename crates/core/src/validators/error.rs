use thiserror::Error;

/// Errors from validator pre-admission checks.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidatorError {
    #[error("{0} is not a known service")]
    UnknownService(String),

    #[error("category {category} is not accepted by service {service}")]
    UnsupportedCategory { service: String, category: String },
}

/// Errors when handing an outcome to the pipeline.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("outcome channel closed")]
    ChannelClosed,

    #[error("verdict {0:?} has no outcome channel")]
    Unroutable(String),
}
