//! Reference point acquisition for proximity search.
//!
//! The device provider may hang indefinitely, so every request is bounded by
//! a timeout and a failure leaves the location unknown. Address lookup is best
//! effort: a fix never fails because the geocoder did.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use bloodlink_geo::GeoPoint;

use crate::ports::{GeocodeError, Geocoder, GeolocationProvider, LocationError, Place, Profile};

/// Address shown when reverse geocoding fails.
pub const FALLBACK_ADDRESS: &str = "Current location";

/// Suggestions returned for a typed address.
pub const SUGGESTION_LIMIT: usize = 5;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationSource {
    Device,
    /// Picked by the user from address search.
    Manual,
    /// Coordinates saved on the user's profile.
    Profile,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationFix {
    pub point: GeoPoint,
    pub address: String,
    pub source: LocationSource,
    pub acquired_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LocationState {
    Unknown { reason: Option<LocationError> },
    Known { fix: LocationFix },
}

impl Default for LocationState {
    fn default() -> Self {
        LocationState::Unknown { reason: None }
    }
}

impl LocationState {
    pub fn point(&self) -> Option<&GeoPoint> {
        match self {
            LocationState::Known { fix } => Some(&fix.point),
            LocationState::Unknown { .. } => None,
        }
    }

    pub fn fix(&self) -> Option<&LocationFix> {
        match self {
            LocationState::Known { fix } => Some(fix),
            LocationState::Unknown { .. } => None,
        }
    }
}

impl From<Result<LocationFix, LocationError>> for LocationState {
    fn from(result: Result<LocationFix, LocationError>) -> Self {
        match result {
            Ok(fix) => LocationState::Known { fix },
            Err(err) => LocationState::Unknown { reason: Some(err) },
        }
    }
}

/// Ask the device for its position, then label it.
pub async fn acquire(
    provider: &dyn GeolocationProvider,
    geocoder: &dyn Geocoder,
    timeout: Duration,
) -> Result<LocationFix, LocationError> {
    let point = match tokio::time::timeout(timeout, provider.current_position()).await {
        Ok(result) => result?,
        Err(_) => {
            tracing::warn!(timeout_ms = timeout.as_millis() as u64, "location: provider timed out");
            return Err(LocationError::TimedOut);
        }
    };

    let address = match geocoder.reverse_geocode(&point).await {
        Ok(address) => address,
        Err(err) => {
            tracing::debug!(error = %err, "location: reverse geocode failed");
            FALLBACK_ADDRESS.to_string()
        }
    };

    tracing::debug!(%point, "location: fix acquired");
    Ok(LocationFix {
        point,
        address,
        source: LocationSource::Device,
        acquired_at: Utc::now(),
    })
}

/// Address suggestions for typed text. Blank text yields nothing.
pub async fn suggest_addresses(geocoder: &dyn Geocoder, text: &str) -> Result<Vec<Place>, GeocodeError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }
    geocoder.search_address(text, SUGGESTION_LIMIT).await
}

/// Resolve a chosen address to a fix using the geocoder's best match.
pub async fn resolve_address(geocoder: &dyn Geocoder, address: &str) -> Result<LocationFix, GeocodeError> {
    let address = address.trim();
    if address.is_empty() {
        return Err(GeocodeError::NoMatch);
    }
    let place = geocoder
        .search_address(address, 1)
        .await?
        .into_iter()
        .next()
        .ok_or(GeocodeError::NoMatch)?;

    Ok(LocationFix {
        point: place.point,
        address: address.to_string(),
        source: LocationSource::Manual,
        acquired_at: Utc::now(),
    })
}

/// Fix from the coordinates saved on a profile, if both are present.
pub fn from_profile(profile: &Profile) -> Option<LocationFix> {
    let point = profile.location()?;
    Some(LocationFix {
        point,
        address: profile
            .location_address
            .clone()
            .unwrap_or_else(|| FALLBACK_ADDRESS.to_string()),
        source: LocationSource::Profile,
        acquired_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{FixedGeolocation, InMemoryGeocoder, PendingGeolocation};

    fn pt(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint {
            latitude: lat,
            longitude: lon,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fix_uses_reverse_geocoded_address() {
        let geocoder = InMemoryGeocoder::new();
        geocoder.add_place("Connaught Place, New Delhi", pt(28.6315, 77.2167));
        let provider = FixedGeolocation::at(pt(28.6315, 77.2167));

        let fix = acquire(&provider, &geocoder, Duration::from_secs(10)).await.unwrap();
        assert_eq!(fix.address, "Connaught Place, New Delhi");
        assert_eq!(fix.source, LocationSource::Device);
    }

    #[tokio::test(start_paused = true)]
    async fn geocoder_failure_keeps_the_fix() {
        let geocoder = InMemoryGeocoder::new();
        let provider = FixedGeolocation::at(pt(1.0, 1.0));

        let fix = acquire(&provider, &geocoder, Duration::from_secs(10)).await.unwrap();
        assert_eq!(fix.address, FALLBACK_ADDRESS);
        assert_eq!(fix.point, pt(1.0, 1.0));
    }

    #[tokio::test(start_paused = true)]
    async fn hanging_provider_times_out() {
        let geocoder = InMemoryGeocoder::new();
        let err = acquire(&PendingGeolocation, &geocoder, Duration::from_secs(10))
            .await
            .unwrap_err();
        assert_eq!(err, LocationError::TimedOut);
        assert_eq!(
            LocationState::from(Err(err)),
            LocationState::Unknown {
                reason: Some(LocationError::TimedOut)
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn permission_denied_is_reported() {
        let geocoder = InMemoryGeocoder::new();
        let provider = FixedGeolocation::failing(LocationError::PermissionDenied);
        let err = acquire(&provider, &geocoder, Duration::from_secs(10)).await.unwrap_err();
        assert_eq!(err, LocationError::PermissionDenied);
    }

    #[tokio::test]
    async fn address_resolution() {
        let geocoder = InMemoryGeocoder::new();
        geocoder.add_place("MG Road, Bengaluru", pt(12.9755, 77.6050));

        let fix = resolve_address(&geocoder, " MG Road ").await.unwrap();
        assert_eq!(fix.source, LocationSource::Manual);
        assert_eq!(fix.address, "MG Road");
        assert_eq!(resolve_address(&geocoder, "   ").await, Err(GeocodeError::NoMatch));
        assert_eq!(resolve_address(&geocoder, "Atlantis").await, Err(GeocodeError::NoMatch));
        assert!(suggest_addresses(&geocoder, "").await.unwrap().is_empty());
        assert_eq!(suggest_addresses(&geocoder, "bengaluru").await.unwrap().len(), 1);
    }
}
