//! WGS84 coordinate pair.

use serde::{Deserialize, Serialize};

use bloodlink_core::{DomainError, DomainResult, ValueObject};

/// A latitude/longitude pair in decimal degrees.
///
/// Records coming from the backend carry `latitude` and `longitude` as two
/// independent nullable columns; [`GeoPoint::from_parts`] is the only place that
/// pairs them, so a half-filled record never turns into a point.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl ValueObject for GeoPoint {}

impl GeoPoint {
    /// Build a validated point.
    pub fn new(latitude: f64, longitude: f64) -> DomainResult<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(DomainError::validation(format!(
                "latitude out of range: {latitude}"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(DomainError::validation(format!(
                "longitude out of range: {longitude}"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Pair two optional columns.
    ///
    /// Returns `None` unless both are present and valid.
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(lat), Some(lon)) => Self::new(lat, lon).ok(),
            _ => None,
        }
    }

    /// Distance to `other` in kilometres.
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        crate::haversine_km(self, other)
    }
}

impl core::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:.5}, {:.5}", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_latitude() {
        assert!(GeoPoint::new(90.5, 0.0).is_err());
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn rejects_out_of_range_longitude() {
        let err = GeoPoint::new(0.0, -181.0).unwrap_err();
        assert!(err.to_string().contains("longitude"));
    }

    #[test]
    fn from_parts_requires_both_columns() {
        assert_eq!(GeoPoint::from_parts(Some(1.0), None), None);
        assert_eq!(GeoPoint::from_parts(None, Some(1.0)), None);
        assert_eq!(GeoPoint::from_parts(None, None), None);
        assert_eq!(
            GeoPoint::from_parts(Some(1.0), Some(2.0)),
            Some(GeoPoint {
                latitude: 1.0,
                longitude: 2.0
            })
        );
    }

    #[test]
    fn from_parts_does_not_default_to_null_island() {
        // A single zero column is still only half a point.
        assert_eq!(GeoPoint::from_parts(Some(0.0), None), None);
    }

    #[test]
    fn deserializes_from_backend_shape() {
        let p: GeoPoint =
            serde_json::from_str(r#"{"latitude": 28.6139, "longitude": 77.209}"#).unwrap();
        assert_eq!(p.latitude, 28.6139);
    }
}
