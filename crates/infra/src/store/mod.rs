//! Product persistence boundary.
//!
//! `ProductStore` maps `Product` values to stored rows without making any
//! storage assumptions: the in-memory store backs tests and development, the
//! Postgres store backs the service.

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryProductStore;
pub use postgres::PostgresProductStore;

use std::sync::Arc;

use thiserror::Error;

use catalog_core::{DomainError, ProductId};
use catalog_products::{Category, Price, Product};

pub type StoreResult<T> = Result<T, StoreError>;

/// Product store operation error.
///
/// `Validation` is the data validation failure raised by the store itself
/// (missing id, malformed fields or stored values). Everything else comes from
/// the storage engine and is passed through as-is.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] DomainError),

    #[error("product {0} not found")]
    NotFound(ProductId),

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error("product store lock poisoned")]
    Poisoned,
}

impl StoreError {
    pub fn is_validation(&self) -> bool {
        matches!(self, StoreError::Validation(DomainError::DataValidation(_)))
    }
}

/// CRUD and search operations over persisted products.
///
/// ## Identity
///
/// - `create` hands out a fresh id and writes it back into the product
/// - `update` and `delete` match rows by id and fail with a data validation
///   error when the product has never been persisted
///
/// ## Searches
///
/// Every `find_by_*` returns exactly the products whose field equals the
/// argument. Results come back in ascending id order, though callers should
/// not depend on it.
#[async_trait::async_trait]
pub trait ProductStore: Send + Sync {
    /// Insert the product as a new row and assign its id.
    async fn create(&self, product: &mut Product) -> StoreResult<()>;

    /// Persist the product's fields to the row with the same id.
    async fn update(&self, product: &Product) -> StoreResult<()>;

    /// Remove the row with the product's id. Absent rows are ignored.
    async fn delete(&self, product: &Product) -> StoreResult<()>;

    async fn find(&self, id: ProductId) -> StoreResult<Option<Product>>;

    async fn all(&self) -> StoreResult<Vec<Product>>;

    async fn find_by_name(&self, name: &str) -> StoreResult<Vec<Product>>;

    async fn find_by_availability(&self, available: bool) -> StoreResult<Vec<Product>>;

    async fn find_by_category(&self, category: Category) -> StoreResult<Vec<Product>>;

    async fn find_by_price(&self, price: Price) -> StoreResult<Vec<Product>>;

    async fn count(&self) -> StoreResult<usize> {
        Ok(self.all().await?.len())
    }

    /// Remove every product.
    async fn clear(&self) -> StoreResult<()>;
}

#[async_trait::async_trait]
impl<S> ProductStore for Arc<S>
where
    S: ProductStore + ?Sized,
{
    async fn create(&self, product: &mut Product) -> StoreResult<()> {
        (**self).create(product).await
    }

    async fn update(&self, product: &Product) -> StoreResult<()> {
        (**self).update(product).await
    }

    async fn delete(&self, product: &Product) -> StoreResult<()> {
        (**self).delete(product).await
    }

    async fn find(&self, id: ProductId) -> StoreResult<Option<Product>> {
        (**self).find(id).await
    }

    async fn all(&self) -> StoreResult<Vec<Product>> {
        (**self).all().await
    }

    async fn find_by_name(&self, name: &str) -> StoreResult<Vec<Product>> {
        (**self).find_by_name(name).await
    }

    async fn find_by_availability(&self, available: bool) -> StoreResult<Vec<Product>> {
        (**self).find_by_availability(available).await
    }

    async fn find_by_category(&self, category: Category) -> StoreResult<Vec<Product>> {
        (**self).find_by_category(category).await
    }

    async fn find_by_price(&self, price: Price) -> StoreResult<Vec<Product>> {
        (**self).find_by_price(price).await
    }

    async fn count(&self) -> StoreResult<usize> {
        (**self).count().await
    }

    async fn clear(&self) -> StoreResult<()> {
        (**self).clear().await
    }
}
