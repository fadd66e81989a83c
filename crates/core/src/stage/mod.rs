//! Payload staging.
//!
//! A [`Stager`] persists an inbound payload and hands back a retrieval URL.
//! Later it resolves a request id back to that URL, or discards the staged
//! object when validation rejects it.
//!
//! # Example
//!
//! ```ignore
//! use ingress_core::stage::{LocalStager, StageInput, Stager};
//!
//! let stager = LocalStager::new("/var/lib/ingress");
//! let mut input = StageInput::from_bytes("req-1", "000001", b"payload".to_vec());
//! let url = stager.stage(&mut input).await?;
//! assert_eq!(stager.get_url("req-1").await?, url);
//! ```

mod error;
mod local;
mod traits;
mod types;

pub use error::StageError;
pub use local::LocalStager;
pub use traits::Stager;
pub use types::StageInput;
