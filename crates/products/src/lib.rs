//! Products domain module.
//!
//! This crate contains the `Product` entity of the catalog and its field-level
//! rules, implemented as plain domain logic (no IO, no storage).

pub mod category;
pub mod price;
pub mod product;

#[cfg(any(test, feature = "testing"))]
pub mod factory;

pub use category::Category;
pub use price::Price;
pub use product::Product;
