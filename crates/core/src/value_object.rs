//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**: two locations
/// naming the same site and lot are the same location, no matter where they
/// were parsed from.
///
/// ```ignore
/// let a: Location = "S1 - L1".parse()?;
/// let b = Location::new("S1", "L1");
/// assert_eq!(a, b);
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
