//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Profiles and discovery candidates are entities: two records with the same
/// id describe the same donor/hospital even if their fields differ.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;

    /// Whether `other` refers to the same record.
    fn same_identity(&self, other: &Self) -> bool
    where
        Self: Sized,
    {
        self.id() == other.id()
    }
}
