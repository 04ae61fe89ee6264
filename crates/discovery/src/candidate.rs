//! Discovery candidates and blood group tokens.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use bloodlink_core::{CandidateId, DomainError, Entity, ValueObject};
use bloodlink_geo::GeoPoint;

/// ABO/Rh blood group.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BloodGroup {
    #[serde(rename = "A+")]
    APos,
    #[serde(rename = "A-")]
    ANeg,
    #[serde(rename = "B+")]
    BPos,
    #[serde(rename = "B-")]
    BNeg,
    #[serde(rename = "AB+")]
    AbPos,
    #[serde(rename = "AB-")]
    AbNeg,
    #[serde(rename = "O+")]
    OPos,
    #[serde(rename = "O-")]
    ONeg,
}

impl ValueObject for BloodGroup {}

impl BloodGroup {
    pub const ALL: [BloodGroup; 8] = [
        BloodGroup::APos,
        BloodGroup::ANeg,
        BloodGroup::BPos,
        BloodGroup::BNeg,
        BloodGroup::AbPos,
        BloodGroup::AbNeg,
        BloodGroup::OPos,
        BloodGroup::ONeg,
    ];

    /// Canonical token as stored on records (`"O+"`, `"AB-"`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            BloodGroup::APos => "A+",
            BloodGroup::ANeg => "A-",
            BloodGroup::BPos => "B+",
            BloodGroup::BNeg => "B-",
            BloodGroup::AbPos => "AB+",
            BloodGroup::AbNeg => "AB-",
            BloodGroup::OPos => "O+",
            BloodGroup::ONeg => "O-",
        }
    }
}

impl core::fmt::Display for BloodGroup {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BloodGroup {
    type Err = DomainError;

    /// Exact, case-sensitive match against the canonical tokens.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BloodGroup::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| DomainError::unknown_token("blood group", s))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CandidateKind {
    Donor,
    Hospital,
    BloodBank,
}

/// A donor, hospital or blood bank eligible for proximity ranking.
///
/// `blood_group` is kept as the raw stored string: records written by older
/// clients may carry non-canonical tokens, and those must simply fail to match
/// a blood group filter rather than fail to load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: CandidateId,
    pub kind: CandidateKind,
    pub display_name: String,
    pub location: Option<GeoPoint>,
    pub blood_group: Option<String>,
    pub is_available: bool,
    pub address: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub services: Vec<String>,
}

impl Entity for Candidate {
    type Id = CandidateId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Candidate {
    pub fn new(id: CandidateId, kind: CandidateKind, display_name: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            display_name: display_name.into(),
            location: None,
            blood_group: None,
            is_available: false,
            address: None,
            phone: None,
            services: Vec::new(),
        }
    }

    pub fn at(mut self, location: GeoPoint) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_blood_group(mut self, group: impl Into<String>) -> Self {
        self.blood_group = Some(group.into());
        self
    }

    pub fn available(mut self, is_available: bool) -> Self {
        self.is_available = is_available;
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Parsed blood group, if the stored token is canonical.
    pub fn blood_group(&self) -> Option<BloodGroup> {
        self.blood_group.as_deref().and_then(|g| g.parse().ok())
    }
}

/// Row shape returned by the candidate store (profiles / hospitals / blood banks).
///
/// Coordinates arrive as two independent nullable columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub id: CandidateId,
    #[serde(alias = "full_name")]
    pub name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub blood_group: Option<String>,
    #[serde(default)]
    pub is_available: Option<bool>,
    #[serde(alias = "location_address")]
    pub address: Option<String>,
    #[serde(alias = "phone_number")]
    pub phone: Option<String>,
    #[serde(default, alias = "hospital_services")]
    pub services: Vec<String>,
}

impl CandidateRecord {
    pub fn into_candidate(self, kind: CandidateKind) -> Candidate {
        Candidate {
            id: self.id,
            kind,
            display_name: self.name.unwrap_or_default(),
            location: GeoPoint::from_parts(self.latitude, self.longitude),
            blood_group: self.blood_group,
            is_available: self.is_available.unwrap_or(false),
            address: self.address,
            phone: self.phone,
            services: self.services,
        }
    }
}
