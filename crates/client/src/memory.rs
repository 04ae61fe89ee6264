//! In-memory adapters for every port, for tests and the demo binary.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use bloodlink_core::UserId;
use bloodlink_discovery::{Candidate, CandidateKind, CandidateRecord};
use bloodlink_geo::{GeoPoint, haversine_km};

use crate::ports::{
    CandidateHints, CandidateStore, GeocodeError, Geocoder, GeolocationProvider, LocationError, Place,
    Profile, ProfileStore, ProfileUpdate, StoreError,
};
use crate::lock;

/// Reverse lookups match a known place within this distance.
const REVERSE_MATCH_KM: f64 = 1.0;

#[derive(Debug, Default)]
struct ProfileRows {
    profiles: HashMap<UserId, Profile>,
    /// Fetches that still report "no row" before the profile shows up.
    pending_misses: HashMap<UserId, u32>,
    fetches: HashMap<UserId, u32>,
    failure: Option<StoreError>,
}

/// Profile table with optional latency and delayed row visibility.
#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    rows: Mutex<ProfileRows>,
    latency: Option<Duration>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every fetch waits `latency` before answering.
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..Self::default()
        }
    }

    pub fn insert(&self, profile: Profile) {
        lock(&self.rows).profiles.insert(profile.id, profile);
    }

    /// Insert a row that the first `misses` fetches will not see.
    pub fn insert_visible_after(&self, profile: Profile, misses: u32) {
        let mut rows = lock(&self.rows);
        rows.pending_misses.insert(profile.id, misses);
        rows.profiles.insert(profile.id, profile);
    }

    /// Fail every fetch and update with `err` until [`Self::recover`].
    pub fn fail_with(&self, err: StoreError) {
        lock(&self.rows).failure = Some(err);
    }

    pub fn recover(&self) {
        lock(&self.rows).failure = None;
    }

    pub fn fetch_count(&self, user_id: UserId) -> u32 {
        lock(&self.rows).fetches.get(&user_id).copied().unwrap_or(0)
    }

    pub fn get(&self, user_id: UserId) -> Option<Profile> {
        lock(&self.rows).profiles.get(&user_id).cloned()
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn fetch_profile(&self, user_id: UserId) -> Result<Option<Profile>, StoreError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let mut rows = lock(&self.rows);
        *rows.fetches.entry(user_id).or_default() += 1;
        if let Some(err) = &rows.failure {
            return Err(err.clone());
        }
        if let Some(misses) = rows.pending_misses.get_mut(&user_id)
            && *misses > 0
        {
            *misses -= 1;
            return Ok(None);
        }
        Ok(rows.profiles.get(&user_id).cloned())
    }

    async fn update_profile(&self, user_id: UserId, update: &ProfileUpdate) -> Result<(), StoreError> {
        let mut rows = lock(&self.rows);
        if let Some(err) = &rows.failure {
            return Err(err.clone());
        }
        let profile = rows.profiles.get_mut(&user_id).ok_or(StoreError::NotFound)?;
        update.apply_to(profile);
        Ok(())
    }
}

/// Candidate tables keyed by kind.
#[derive(Debug, Default)]
pub struct InMemoryCandidateStore {
    tables: Mutex<HashMap<CandidateKind, Vec<Candidate>>>,
    failure: Mutex<Option<StoreError>>,
    latency: Option<Duration>,
}

impl InMemoryCandidateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..Self::default()
        }
    }

    pub fn insert(&self, candidate: Candidate) {
        lock(&self.tables).entry(candidate.kind).or_default().push(candidate);
    }

    /// Load backend rows (a JSON array) as candidates of `kind`.
    pub fn load_json(&self, kind: CandidateKind, json: &str) -> Result<usize, serde_json::Error> {
        let records: Vec<CandidateRecord> = serde_json::from_str(json)?;
        let count = records.len();
        lock(&self.tables)
            .entry(kind)
            .or_default()
            .extend(records.into_iter().map(|r| r.into_candidate(kind)));
        Ok(count)
    }

    pub fn fail_with(&self, err: StoreError) {
        *lock(&self.failure) = Some(err);
    }
}

#[async_trait]
impl CandidateStore for InMemoryCandidateStore {
    async fn list_candidates(
        &self,
        kind: CandidateKind,
        hints: &CandidateHints,
    ) -> Result<Vec<Candidate>, StoreError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if let Some(err) = lock(&self.failure).clone() {
            return Err(err);
        }

        let tables = lock(&self.tables);
        let rows = tables.get(&kind).map(Vec::as_slice).unwrap_or_default();
        Ok(rows
            .iter()
            .filter(|c| !hints.available_only || c.is_available)
            .filter(|c| {
                hints
                    .blood_group
                    .is_none_or(|g| c.blood_group.as_deref() == Some(g.as_str()))
            })
            .cloned()
            .collect())
    }
}

/// Device that answers with a fixed result, immediately unless given a latency.
#[derive(Debug, Clone)]
pub struct FixedGeolocation {
    result: Result<GeoPoint, LocationError>,
    latency: Option<Duration>,
}

impl FixedGeolocation {
    pub fn at(point: GeoPoint) -> Self {
        Self {
            result: Ok(point),
            latency: None,
        }
    }

    pub fn failing(err: LocationError) -> Self {
        Self {
            result: Err(err),
            latency: None,
        }
    }

    /// Answer only after `latency` has passed.
    pub fn after(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }
}

#[async_trait]
impl GeolocationProvider for FixedGeolocation {
    async fn current_position(&self) -> Result<GeoPoint, LocationError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        self.result
    }
}

/// Device that never answers.
#[derive(Debug, Clone, Copy, Default)]
pub struct PendingGeolocation;

#[async_trait]
impl GeolocationProvider for PendingGeolocation {
    async fn current_position(&self) -> Result<GeoPoint, LocationError> {
        std::future::pending().await
    }
}

/// Gazetteer of known places.
#[derive(Debug, Default)]
pub struct InMemoryGeocoder {
    places: Mutex<Vec<Place>>,
}

impl InMemoryGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_place(&self, address: impl Into<String>, point: GeoPoint) {
        lock(&self.places).push(Place {
            address: address.into(),
            point,
        });
    }
}

#[async_trait]
impl Geocoder for InMemoryGeocoder {
    async fn reverse_geocode(&self, point: &GeoPoint) -> Result<String, GeocodeError> {
        lock(&self.places)
            .iter()
            .map(|p| (haversine_km(point, &p.point), p))
            .filter(|(d, _)| *d <= REVERSE_MATCH_KM)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, p)| p.address.clone())
            .ok_or(GeocodeError::NoMatch)
    }

    async fn search_address(&self, text: &str, limit: usize) -> Result<Vec<Place>, GeocodeError> {
        let needle = text.to_lowercase();
        Ok(lock(&self.places)
            .iter()
            .filter(|p| p.address.to_lowercase().contains(&needle))
            .take(limit)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bloodlink_discovery::BloodGroup;

    #[tokio::test]
    async fn candidate_hints_narrow_the_snapshot() {
        let store = InMemoryCandidateStore::new();
        let json = r#"[
            {"id": "0190d5a0-0000-7000-8000-000000000001", "full_name": "Asha",
             "blood_group": "O+", "is_available": true, "latitude": 1.0, "longitude": 1.0},
            {"id": "0190d5a0-0000-7000-8000-000000000002", "full_name": "Ravi",
             "blood_group": "O+", "is_available": false},
            {"id": "0190d5a0-0000-7000-8000-000000000003", "full_name": "Meera",
             "blood_group": "B-", "is_available": true}
        ]"#;
        assert_eq!(store.load_json(CandidateKind::Donor, json).unwrap(), 3);

        let hints = CandidateHints {
            blood_group: Some(BloodGroup::OPos),
            available_only: true,
        };
        let rows = store.list_candidates(CandidateKind::Donor, &hints).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].display_name, "Asha");

        let banks = store
            .list_candidates(CandidateKind::BloodBank, &CandidateHints::default())
            .await
            .unwrap();
        assert!(banks.is_empty());
    }

    #[tokio::test]
    async fn update_of_missing_profile_is_not_found() {
        let store = InMemoryProfileStore::new();
        let err = store
            .update_profile(UserId::new(), &ProfileUpdate::default())
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::NotFound);
    }

    #[tokio::test]
    async fn reverse_geocode_picks_nearest_known_place() {
        let geocoder = InMemoryGeocoder::new();
        geocoder.add_place("A", GeoPoint::new(0.0, 0.0).unwrap());
        geocoder.add_place("B", GeoPoint::new(0.0, 0.005).unwrap());

        let near_b = GeoPoint::new(0.0, 0.004).unwrap();
        assert_eq!(geocoder.reverse_geocode(&near_b).await.unwrap(), "B");

        let far = GeoPoint::new(10.0, 10.0).unwrap();
        assert_eq!(geocoder.reverse_geocode(&far).await, Err(GeocodeError::NoMatch));
    }
}
