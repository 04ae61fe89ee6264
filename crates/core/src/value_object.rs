//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have **no identity**: a coordinate pair or a blood group token
/// is defined entirely by its attributes. They are immutable; "changing" one
/// means constructing a new value.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq)]
/// struct GeoPoint { latitude: f64, longitude: f64 }
///
/// impl ValueObject for GeoPoint {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
