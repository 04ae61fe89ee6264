//! External collaborators the client talks to.
//!
//! All of them are asynchronous and owned by the hosted backend or the
//! platform; the client only sees these traits.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use bloodlink_auth::Role;
use bloodlink_core::UserId;
use bloodlink_discovery::{BloodGroup, Candidate, CandidateKind};
use bloodlink_geo::GeoPoint;

/// Profile record as far as the client relies on it.
///
/// Only `role`, `is_available`, `blood_group`, `latitude` and `longitude` are
/// assumed to be meaningful; everything else is display data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: UserId,
    pub role: Role,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub blood_group: Option<String>,
    #[serde(default)]
    pub is_available: Option<bool>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub location_address: Option<String>,
}

impl Profile {
    pub fn location(&self) -> Option<GeoPoint> {
        GeoPoint::from_parts(self.latitude, self.longitude)
    }
}

/// Partial profile update. There is no role field: users cannot change their role.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blood_group: Option<BloodGroup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
}

impl ProfileUpdate {
    pub fn apply_to(&self, profile: &mut Profile) {
        if let Some(name) = &self.full_name {
            profile.full_name = Some(name.clone());
        }
        if let Some(group) = self.blood_group {
            profile.blood_group = Some(group.as_str().to_string());
        }
        if let Some(available) = self.is_available {
            profile.is_available = Some(available);
        }
        if let Some(address) = &self.location_address {
            profile.location_address = Some(address.clone());
        }
        if let Some(point) = self.location {
            profile.latitude = Some(point.latitude);
            profile.longitude = Some(point.longitude);
        }
    }
}

/// Server-side narrowing hints. The store may ignore them; the client always
/// re-applies its own filters on the returned snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateHints {
    pub blood_group: Option<BloodGroup>,
    pub available_only: bool,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("backend unavailable: {0}")]
    Unavailable(String),

    #[error("backend rejected request: {0}")]
    Rejected(String),
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("location unavailable")]
    Unavailable,

    #[error("timed out waiting for a location fix")]
    TimedOut,
}

/// Geocoder match: a display address and its coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub address: String,
    pub point: GeoPoint,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GeocodeError {
    #[error("no match")]
    NoMatch,

    #[error("geocoder unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// `Ok(None)` when no profile row exists (yet) for the user.
    async fn fetch_profile(&self, user_id: UserId) -> Result<Option<Profile>, StoreError>;

    async fn update_profile(&self, user_id: UserId, update: &ProfileUpdate) -> Result<(), StoreError>;
}

#[async_trait]
pub trait CandidateStore: Send + Sync {
    /// Snapshot of candidates of one kind; not a live subscription.
    async fn list_candidates(
        &self,
        kind: CandidateKind,
        hints: &CandidateHints,
    ) -> Result<Vec<Candidate>, StoreError>;
}

#[async_trait]
pub trait GeolocationProvider: Send + Sync {
    /// May never resolve; callers must bound it with a timeout.
    async fn current_position(&self) -> Result<GeoPoint, LocationError>;
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn reverse_geocode(&self, point: &GeoPoint) -> Result<String, GeocodeError>;

    /// Best matches first. An empty list is a valid answer.
    async fn search_address(&self, text: &str, limit: usize) -> Result<Vec<Place>, GeocodeError>;
}
