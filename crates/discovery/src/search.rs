//! Proximity search: filter, measure, bound, rank.
//!
//! Steps run in a fixed order, each on the survivors of the previous one:
//!
//! 1. drop candidates without a location (only when radius or ranking is requested)
//! 2. blood group
//! 3. availability
//! 4. text query
//! 5. distance from the origin
//! 6. radius bound
//! 7. stable ascending sort by distance
//!
//! Without an origin only steps 2–4 run and the outcome reports
//! [`OriginStatus::Unknown`] so the UI can show "location unknown" next to an
//! unordered list.

use serde::Serialize;

use bloodlink_geo::{GeoPoint, format_distance, haversine_km};

use crate::filters::matches_text;
use crate::{Candidate, SearchFilters};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OriginStatus {
    Known,
    /// No reference point yet; results are filtered but not ranked.
    Unknown,
}

/// A candidate with its computed distance.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedCandidate {
    pub candidate: Candidate,
    /// `None` when either endpoint has no location.
    pub distance_km: Option<f64>,
}

impl RankedCandidate {
    pub fn distance_label(&self) -> Option<String> {
        self.distance_km.map(format_distance)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOutcome {
    pub results: Vec<RankedCandidate>,
    pub origin: OriginStatus,
}

impl SearchOutcome {
    /// An empty result is a valid answer, not an error.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn candidates(&self) -> impl Iterator<Item = &Candidate> {
        self.results.iter().map(|r| &r.candidate)
    }

    pub fn into_candidates(self) -> Vec<Candidate> {
        self.results.into_iter().map(|r| r.candidate).collect()
    }
}

/// Rank and filter `candidates` around `origin`.
///
/// Pure and reentrant.
pub fn proximity_search<I>(
    origin: Option<&GeoPoint>,
    candidates: I,
    filters: &SearchFilters,
) -> SearchOutcome
where
    I: IntoIterator<Item = Candidate>,
{
    let query = filters.normalized_query();

    let Some(origin) = origin else {
        let results: Vec<RankedCandidate> = candidates
            .into_iter()
            .filter(|c| filters.matches_blood_group(c))
            .filter(|c| filters.matches_availability(c))
            .filter(|c| query.as_deref().is_none_or(|q| matches_text(c, q)))
            .map(|candidate| RankedCandidate {
                candidate,
                distance_km: None,
            })
            .collect();

        tracing::debug!(results = results.len(), "search: no origin, unranked results");
        return SearchOutcome {
            results,
            origin: OriginStatus::Unknown,
        };
    };

    let needs_location = filters.needs_location();

    let mut results: Vec<RankedCandidate> = candidates
        .into_iter()
        .filter(|c| !needs_location || c.location.is_some())
        .filter(|c| filters.matches_blood_group(c))
        .filter(|c| filters.matches_availability(c))
        .filter(|c| query.as_deref().is_none_or(|q| matches_text(c, q)))
        .map(|candidate| {
            let distance_km = candidate.location.as_ref().map(|p| haversine_km(origin, p));
            RankedCandidate {
                candidate,
                distance_km,
            }
        })
        .filter(|r| match (filters.max_radius_km, r.distance_km) {
            (Some(max), Some(d)) => d <= max,
            _ => true,
        })
        .collect();

    if filters.sort_by_distance {
        // Vec::sort_by is stable: equal distances keep input order.
        results.sort_by(|a, b| {
            let a = a.distance_km.unwrap_or(f64::INFINITY);
            let b = b.distance_km.unwrap_or(f64::INFINITY);
            a.total_cmp(&b)
        });
    }

    tracing::debug!(
        results = results.len(),
        radius_km = ?filters.max_radius_km,
        ranked = filters.sort_by_distance,
        "search: ranked results"
    );

    SearchOutcome {
        results,
        origin: OriginStatus::Known,
    }
}
