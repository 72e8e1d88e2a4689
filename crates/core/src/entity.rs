//! Entity trait: identity that survives attribute changes.

/// Entity marker + minimal interface.
///
/// Catalog entities are identified by their business key (a product or
/// category code), not by the storage row id.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
