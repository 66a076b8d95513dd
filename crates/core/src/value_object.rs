//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have no identity and are immutable: "changing" one means
/// building a new one. An email address is a value object; a profile is an
/// [`Entity`](crate::Entity).
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
