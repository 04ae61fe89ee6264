//! Search filter criteria.

use serde::{Deserialize, Serialize};

use crate::{BloodGroup, Candidate};

/// Filters applied by [`crate::proximity_search`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    pub blood_group: Option<BloodGroup>,
    pub max_radius_km: Option<f64>,
    #[serde(default)]
    pub available_only: bool,
    pub text_query: Option<String>,
    /// Rank by distance from the origin. Requires candidates to carry a location.
    #[serde(default = "default_sort")]
    pub sort_by_distance: bool,
}

fn default_sort() -> bool {
    true
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            blood_group: None,
            max_radius_km: None,
            available_only: false,
            text_query: None,
            sort_by_distance: true,
        }
    }
}

impl SearchFilters {
    /// No radius, no attribute filters, no distance ranking.
    pub fn unranked() -> Self {
        Self {
            sort_by_distance: false,
            ..Self::default()
        }
    }

    pub fn blood_group(mut self, group: BloodGroup) -> Self {
        self.blood_group = Some(group);
        self
    }

    pub fn within_km(mut self, radius_km: f64) -> Self {
        self.max_radius_km = Some(radius_km);
        self
    }

    pub fn available_only(mut self) -> Self {
        self.available_only = true;
        self
    }

    pub fn text(mut self, query: impl Into<String>) -> Self {
        self.text_query = Some(query.into());
        self
    }

    /// Whether the candidate's location is needed (radius or ranking requested).
    pub(crate) fn needs_location(&self) -> bool {
        self.max_radius_km.is_some() || self.sort_by_distance
    }

    /// Normalized, lower-cased query; `None` when blank.
    pub(crate) fn normalized_query(&self) -> Option<String> {
        self.text_query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase)
    }

    pub(crate) fn matches_blood_group(&self, candidate: &Candidate) -> bool {
        match self.blood_group {
            Some(group) => candidate.blood_group.as_deref() == Some(group.as_str()),
            None => true,
        }
    }

    pub(crate) fn matches_availability(&self, candidate: &Candidate) -> bool {
        !self.available_only || candidate.is_available
    }
}

/// Case-insensitive substring match against the name and address.
pub(crate) fn matches_text(candidate: &Candidate, lowered_query: &str) -> bool {
    candidate.display_name.to_lowercase().contains(lowered_query)
        || candidate
            .address
            .as_deref()
            .is_some_and(|a| a.to_lowercase().contains(lowered_query))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CandidateKind;
    use bloodlink_core::CandidateId;

    #[test]
    fn whitespace_query_is_blank() {
        assert_eq!(SearchFilters::default().text("   ").normalized_query(), None);
        assert_eq!(
            SearchFilters::default().text(" Apollo ").normalized_query().as_deref(),
            Some("apollo")
        );
    }

    #[test]
    fn text_matches_address_too() {
        let c = Candidate::new(CandidateId::new(), CandidateKind::Hospital, "Apollo")
            .with_address("Greams Road, Chennai");
        assert!(matches_text(&c, "chennai"));
        assert!(matches_text(&c, "apol"));
        assert!(!matches_text(&c, "delhi"));
    }

    #[test]
    fn blood_group_filter_is_exact() {
        let filters = SearchFilters::default().blood_group(BloodGroup::OPos);
        let exact = Candidate::new(CandidateId::new(), CandidateKind::Donor, "a").with_blood_group("O+");
        let lower = Candidate::new(CandidateId::new(), CandidateKind::Donor, "b").with_blood_group("o+");
        let none = Candidate::new(CandidateId::new(), CandidateKind::Donor, "c");
        assert!(filters.matches_blood_group(&exact));
        assert!(!filters.matches_blood_group(&lower));
        assert!(!filters.matches_blood_group(&none));
    }

    #[test]
    fn deserialize_defaults_to_ranked() {
        let filters: SearchFilters = serde_json::from_str(r#"{"bloodGroup": "A-"}"#).unwrap();
        assert_eq!(filters.blood_group, Some(BloodGroup::ANeg));
        assert!(filters.sort_by_distance);
        assert!(!filters.available_only);
    }
}
