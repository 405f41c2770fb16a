//! Entity trait: identity + continuity across state changes.

use crate::error::{DomainError, DomainResult};

/// Entity marker + minimal interface.
///
/// Identity is assigned by the storage engine, so an entity that has never
/// been persisted has no id yet.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier, if one has been assigned.
    fn id(&self) -> Option<Self::Id>;

    /// Whether the entity has been persisted at least once.
    fn is_persisted(&self) -> bool {
        self.id().is_some()
    }

    /// Returns the identifier or a validation error naming the operation that needed it.
    fn require_id(&self, operation: &str) -> DomainResult<Self::Id> {
        self.id().ok_or_else(|| {
            DomainError::data_validation(format!("{operation} called with empty ID field"))
        })
    }
}
