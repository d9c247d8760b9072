//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value** - they have no
/// identity of their own. A `ThresholdPolicy` or a computed performance
/// summary is a value object; a `Medicine` with an id is an entity.
///
/// To "modify" a value object, create a new one with the new values.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
