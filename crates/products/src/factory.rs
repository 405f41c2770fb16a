//! Proptest strategies for generating unpersisted products in tests.
//!
//! Names and descriptions are drawn from small pools so that batches contain
//! duplicates, which is what the search tests need.

use proptest::prelude::*;
use proptest::strategy::ValueTree;
use proptest::test_runner::TestRunner;
use rust_decimal::Decimal;

use crate::{Category, Price, Product};

pub const NAMES: [&str; 11] = [
    "Hat", "Pants", "Shirt", "Apple", "Banana", "Pots", "Towels", "Ford", "Chevy", "Hammer",
    "Wrench",
];

pub fn any_category() -> impl Strategy<Value = Category> {
    prop::sample::select(Category::ALL.to_vec())
}

/// Prices between 0.50 and 2000.00.
pub fn any_price() -> impl Strategy<Value = Price> {
    (50i64..=200_000i64).prop_filter_map("price outside NUMERIC(10,2)", |cents| {
        Price::new(Decimal::new(cents, 2)).ok()
    })
}

pub fn any_product() -> impl Strategy<Value = Product> {
    (
        prop::sample::select(NAMES.to_vec()),
        proptest::option::weighted(0.8, "[A-Za-z][a-z ]{0,40}"),
        any_price(),
        any::<bool>(),
        any_category(),
    )
        .prop_map(|(name, description, price, available, category)| {
            Product::new(name, description, price, available, category)
        })
}

/// Deterministic batch of `count` products, like a fixture factory.
pub fn product_batch(count: usize) -> Vec<Product> {
    let mut runner = TestRunner::deterministic();
    let strategy = any_product();
    (0..count)
        .filter_map(|_| strategy.new_tree(&mut runner).ok().map(|tree| tree.current()))
        .collect()
}

/// A single generated product.
pub fn product() -> Product {
    let mut runner = TestRunner::default();
    any_product()
        .new_tree(&mut runner)
        .map(|tree| tree.current())
        .unwrap_or_else(|_| {
            Product::new("Hat", None, Price::default(), true, Category::Cloths)
        })
}
