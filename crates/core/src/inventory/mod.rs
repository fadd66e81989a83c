//! External inventory lookups.

use async_trait::async_trait;
use thiserror::Error;

use crate::model::ValidationRequest;

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("no inventory record for request {0}")]
    NotFound(String),

    #[error("inventory service unavailable: {0}")]
    Unavailable(String),
}

/// Resolves a request to its external system identifier.
#[async_trait]
pub trait Inventory: Send + Sync {
    async fn get_id(&self, request: &ValidationRequest) -> Result<String, InventoryError>;
}

/// Inventory that answers every lookup with the same id.
#[derive(Debug, Clone)]
pub struct StaticInventory {
    id: String,
}

impl StaticInventory {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

#[async_trait]
impl Inventory for StaticInventory {
    async fn get_id(&self, _request: &ValidationRequest) -> Result<String, InventoryError> {
        Ok(self.id.clone())
    }
}
