use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

use super::{ItemStore, StoreError, StoreResult};
use crate::models::{Product, ProductPatch};

/// Process-local store with the same conditional semantics as DynamoDB.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RwLock<HashMap<String, Product>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }
}

#[async_trait]
impl ItemStore for MemoryStore {
    async fn put_new(&self, product: &Product) -> StoreResult<()> {
        let mut items = self.items.write();
        if items.contains_key(&product.id) {
            return Err(StoreError::Conflict);
        }
        items.insert(product.id.clone(), product.clone());
        Ok(())
    }

    async fn get(&self, id: &str) -> StoreResult<Option<Product>> {
        Ok(self.items.read().get(id).cloned())
    }

    async fn scan(&self) -> StoreResult<Vec<Product>> {
        Ok(self.items.read().values().cloned().collect())
    }

    async fn update_existing(&self, id: &str, patch: &ProductPatch) -> StoreResult<Product> {
        let mut items = self.items.write();
        let product = items.get_mut(id).ok_or(StoreError::NotFound)?;

        // Keep updatedAt strictly increasing even on a coarse clock.
        let now = Utc::now().max(product.updated_at + chrono::Duration::microseconds(1));
        patch.apply(product, now);

        Ok(product.clone())
    }

    async fn delete_existing(&self, id: &str) -> StoreResult<Product> {
        self.items.write().remove(id).ok_or(StoreError::NotFound)
    }

    async fn check_health(&self) -> StoreResult<()> {
        Ok(())
    }
}
