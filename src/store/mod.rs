//! The item store holding products, keyed by `id`.

mod dynamo;
pub mod expression;
mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::{
    config::{StoreBackend, StoreConfig},
    error::Result,
    models::{Product, ProductPatch},
};

pub use dynamo::DynamoStore;
pub use memory::MemoryStore;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The conditional check required an existing item and found none.
    #[error("item not found")]
    NotFound,
    /// The conditional check required no item and found one.
    #[error("item already exists")]
    Conflict,
    #[error("{0}")]
    Other(String),
}

/// Conditional CRUD primitives over a single product table.
///
/// Implementations must be safe to share across concurrent invocations;
/// the store alone decides existence at the time of each conditional check.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Inserts `product`, failing with [`StoreError::Conflict`] if its id exists.
    async fn put_new(&self, product: &Product) -> StoreResult<()>;

    async fn get(&self, id: &str) -> StoreResult<Option<Product>>;

    /// Reads the whole table in one pass. Order is store-defined.
    async fn scan(&self) -> StoreResult<Vec<Product>>;

    /// Merges `patch` into an existing item and returns the merged item.
    async fn update_existing(&self, id: &str, patch: &ProductPatch) -> StoreResult<Product>;

    /// Removes an existing item and returns its last state.
    async fn delete_existing(&self, id: &str) -> StoreResult<Product>;

    async fn check_health(&self) -> StoreResult<()>;
}

/// Builds the process-wide store selected by `config`.
pub async fn connect(config: &StoreConfig) -> Result<Arc<dyn ItemStore>> {
    let store: Arc<dyn ItemStore> = match config.backend {
        StoreBackend::DynamoDb => {
            let client = crate::config::load_dynamo_client(config).await?;
            Arc::new(DynamoStore::new(client, config.table_name()?))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory product store; data is not persisted");
            Arc::new(MemoryStore::new())
        }
    };

    Ok(store)
}
