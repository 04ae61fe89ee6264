//! Coordinates and great-circle distance.
//!
//! Pure and synchronous: safe to call from any context, no IO.

pub mod distance;
pub mod point;

pub use distance::{EARTH_RADIUS_KM, format_distance, haversine_km};
pub use point::GeoPoint;
