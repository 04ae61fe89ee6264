//! Nearest-match search over donors, hospitals and
//! blood banks.

pub mod candidate;
pub mod filters;
pub mod search;

pub use candidate::{BloodGroup, Candidate, CandidateKind, CandidateRecord};
pub use filters::SearchFilters;
pub use search::{OriginStatus, RankedCandidate, SearchOutcome, proximity_search};
