//! Types for the stage module.

use std::fmt;
use std::io::Cursor;

use tokio::io::AsyncRead;

/// An inbound payload waiting to be staged.
///
/// The payload reader is released when the input is dropped.
pub struct StageInput {
    /// Object key, normally the request id.
    pub key: String,
    pub account: String,
    /// Declared payload size in bytes.
    pub size: u64,
    payload: Box<dyn AsyncRead + Send + Unpin>,
}

impl StageInput {
    pub fn new(
        key: impl Into<String>,
        account: impl Into<String>,
        size: u64,
        payload: impl AsyncRead + Send + Unpin + 'static,
    ) -> Self {
        Self {
            key: key.into(),
            account: account.into(),
            size,
            payload: Box::new(payload),
        }
    }

    /// Build an input from an in-memory payload.
    pub fn from_bytes(key: impl Into<String>, account: impl Into<String>, bytes: Vec<u8>) -> Self {
        let size = bytes.len() as u64;
        Self::new(key, account, size, Cursor::new(bytes))
    }

    pub fn payload_mut(&mut self) -> &mut (dyn AsyncRead + Send + Unpin + 'static) {
        self.payload.as_mut()
    }
}

impl fmt::Debug for StageInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StageInput")
            .field("key", &self.key)
            .field("account", &self.account)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}
