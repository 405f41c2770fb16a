//! Infrastructure layer: product persistence and database configuration.

pub mod config;
pub mod store;

pub use config::DatabaseConfig;
pub use store::{InMemoryProductStore, PostgresProductStore, ProductStore, StoreError, StoreResult};
