use std::collections::BTreeMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicI64, Ordering};

use tracing::debug;

use catalog_core::{Entity, ProductId};
use catalog_products::{Category, Price, Product};

use super::{ProductStore, StoreError, StoreResult};

/// In-memory product store.
///
/// Intended for tests/dev. Ids come from a counter and are never reused, even
/// after `clear`.
#[derive(Debug)]
pub struct InMemoryProductStore {
    rows: RwLock<BTreeMap<ProductId, Product>>,
    next_id: AtomicI64,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    fn select<F>(&self, predicate: F) -> StoreResult<Vec<Product>>
    where
        F: Fn(&Product) -> bool,
    {
        let rows = self.rows.read().map_err(|_| StoreError::Poisoned)?;
        Ok(rows.values().filter(|p| predicate(p)).cloned().collect())
    }
}

impl Default for InMemoryProductStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ProductStore for InMemoryProductStore {
    async fn create(&self, product: &mut Product) -> StoreResult<()> {
        product.validate()?;

        let mut rows = self.rows.write().map_err(|_| StoreError::Poisoned)?;
        let id = ProductId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        product.assign_id(id);
        rows.insert(id, product.clone());

        debug!(product_id = %id, name = %product.name, "created product");
        Ok(())
    }

    async fn update(&self, product: &Product) -> StoreResult<()> {
        let id = product.require_id("Update")?;
        product.validate()?;

        let mut rows = self.rows.write().map_err(|_| StoreError::Poisoned)?;
        let row = rows.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        *row = product.clone();

        debug!(product_id = %id, "updated product");
        Ok(())
    }

    async fn delete(&self, product: &Product) -> StoreResult<()> {
        let id = product.require_id("Delete")?;

        let mut rows = self.rows.write().map_err(|_| StoreError::Poisoned)?;
        if rows.remove(&id).is_some() {
            debug!(product_id = %id, "deleted product");
        }
        Ok(())
    }

    async fn find(&self, id: ProductId) -> StoreResult<Option<Product>> {
        let rows = self.rows.read().map_err(|_| StoreError::Poisoned)?;
        Ok(rows.get(&id).cloned())
    }

    async fn all(&self) -> StoreResult<Vec<Product>> {
        self.select(|_| true)
    }

    async fn find_by_name(&self, name: &str) -> StoreResult<Vec<Product>> {
        self.select(|p| p.name == name)
    }

    async fn find_by_availability(&self, available: bool) -> StoreResult<Vec<Product>> {
        self.select(|p| p.available == available)
    }

    async fn find_by_category(&self, category: Category) -> StoreResult<Vec<Product>> {
        self.select(|p| p.category == category)
    }

    async fn find_by_price(&self, price: Price) -> StoreResult<Vec<Product>> {
        self.select(|p| p.price == price)
    }

    async fn count(&self) -> StoreResult<usize> {
        let rows = self.rows.read().map_err(|_| StoreError::Poisoned)?;
        Ok(rows.len())
    }

    async fn clear(&self) -> StoreResult<()> {
        let mut rows = self.rows.write().map_err(|_| StoreError::Poisoned)?;
        rows.clear();
        Ok(())
    }
}
