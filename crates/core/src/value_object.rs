//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have no identity: two values with the same attributes are the
/// same value. `Price` is one; `Product` is not (it is an `Entity`).
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct Price(Decimal);
///
/// impl ValueObject for Price {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
