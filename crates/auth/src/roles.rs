use core::str::FromStr;

use serde::{Deserialize, Serialize};

use bloodlink_core::DomainError;

/// Capability class of an authenticated user.
///
/// The backend stores donors as `"user"`; `"donor"` is accepted when parsing so
/// older signup payloads still resolve.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[serde(rename = "user", alias = "donor")]
    Donor,
    Hospital,
    Agent,
    Admin,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Donor, Role::Hospital, Role::Agent, Role::Admin];

    /// Wire token as stored on the profile record.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Donor => "user",
            Role::Hospital => "hospital",
            Role::Agent => "agent",
            Role::Admin => "admin",
        }
    }

    /// Display label ("Hospital", "Agent", ...).
    pub fn label(&self) -> &'static str {
        match self {
            Role::Donor => "Donor",
            Role::Hospital => "Hospital",
            Role::Agent => "Agent",
            Role::Admin => "Admin",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "user" | "donor" => Ok(Role::Donor),
            "hospital" => Ok(Role::Hospital),
            "agent" => Ok(Role::Agent),
            "admin" => Ok(Role::Admin),
            other => Err(DomainError::unknown_token("role", other)),
        }
    }
}
