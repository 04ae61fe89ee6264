//! Declarative screen table.
//!
//! Every screen the client can render is listed once in [`SCREENS`] together
//! with its gate. The router consults this table; nothing else branches on
//! screen names.

use serde::{Deserialize, Serialize};

use crate::Role;

/// Named screen of the client.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Screen {
    Home,
    Profile,
    EditProfile,
    DonorSearch,
    Hospitals,
    BloodBanks,
    Donations,
    DonationHistory,
    Messages,
    Settings,

    HospitalDashboard,
    HospitalRequests,
    HospitalSubscription,

    AgentDashboard,
    AgentReferrals,
    AgentCommissions,
    AgentEarnings,

    AdminDashboard,
    AdminUsers,
    AdminHospitals,
    AdminAgents,
    AdminDonations,
    AdminCommissions,
    AdminAnalytics,
    AdminSettings,

    Login,
    Signup,
    ResetPassword,
}

/// Static gate and metadata of a screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenSpec {
    pub screen: Screen,
    pub key: &'static str,
    pub path: &'static str,
    pub title: &'static str,
    /// Roles allowed to open the screen. Empty means no role gate.
    pub allowed_roles: &'static [Role],
    pub requires_auth: bool,
    pub admin_only: bool,
}

impl ScreenSpec {
    pub fn allows(&self, role: Option<Role>) -> bool {
        self.allowed_roles.is_empty() || role.is_some_and(|r| self.allowed_roles.contains(&r))
    }

    /// Whether the screen produces a proximity-ranked candidate list.
    pub fn is_discovery(&self) -> bool {
        matches!(
            self.screen,
            Screen::DonorSearch | Screen::Hospitals | Screen::BloodBanks
        )
    }
}

const EVERYONE: &[Role] = &[Role::Donor, Role::Hospital, Role::Agent, Role::Admin];
const DONORS: &[Role] = &[Role::Donor, Role::Admin];
const HOSPITALS: &[Role] = &[Role::Hospital, Role::Admin];
const AGENTS: &[Role] = &[Role::Agent, Role::Admin];
const ADMINS: &[Role] = &[Role::Admin];
const PUBLIC: &[Role] = &[];

macro_rules! screen {
    ($screen:ident, $key:literal, $path:literal, $title:literal, $roles:expr) => {
        screen!($screen, $key, $path, $title, $roles, true, false)
    };
    ($screen:ident, $key:literal, $path:literal, $title:literal, $roles:expr, $auth:expr, $admin:expr) => {
        ScreenSpec {
            screen: Screen::$screen,
            key: $key,
            path: $path,
            title: $title,
            allowed_roles: $roles,
            requires_auth: $auth,
            admin_only: $admin,
        }
    };
}

/// The screen table.
pub static SCREENS: &[ScreenSpec] = &[
    screen!(Home, "home", "/", "Home", EVERYONE),
    screen!(Profile, "profile", "/profile", "Profile", EVERYONE),
    screen!(EditProfile, "editProfile", "/profile/edit", "Edit Profile", EVERYONE),
    screen!(DonorSearch, "donorSearch", "/donors", "Find Donors", EVERYONE),
    screen!(Hospitals, "hospitals", "/hospitals", "Hospitals", EVERYONE),
    screen!(BloodBanks, "bloodBanks", "/banks", "Blood Banks", EVERYONE),
    screen!(Donations, "donations", "/donations", "Donations", DONORS),
    screen!(DonationHistory, "donationHistory", "/donations/history", "Donation History", DONORS),
    screen!(Messages, "messages", "/messages", "Messages", EVERYONE),
    screen!(Settings, "settings", "/settings", "Settings", EVERYONE),
    screen!(HospitalDashboard, "hospitalDashboard", "/hospital/dashboard", "Dashboard", HOSPITALS),
    screen!(HospitalRequests, "hospitalRequests", "/hospital/requests", "Blood Requests", HOSPITALS),
    screen!(HospitalSubscription, "hospitalSubscription", "/hospital/subscription", "Subscription", HOSPITALS),
    screen!(AgentDashboard, "agentDashboard", "/agent/dashboard", "Dashboard", AGENTS),
    screen!(AgentReferrals, "agentReferrals", "/agent/referrals", "Referrals", AGENTS),
    screen!(AgentCommissions, "agentCommissions", "/agent/commissions", "Commissions", AGENTS),
    screen!(AgentEarnings, "agentEarnings", "/agent/earnings", "Earnings", AGENTS),
    screen!(AdminDashboard, "adminDashboard", "/admin/dashboard", "Admin Dashboard", ADMINS, true, true),
    screen!(AdminUsers, "adminUsers", "/admin/users", "Users", ADMINS, true, true),
    screen!(AdminHospitals, "adminHospitals", "/admin/hospitals", "Hospitals", ADMINS, true, true),
    screen!(AdminAgents, "adminAgents", "/admin/agents", "Agents", ADMINS, true, true),
    screen!(AdminDonations, "adminDonations", "/admin/donations", "Donations", ADMINS, true, true),
    screen!(AdminCommissions, "adminCommissions", "/admin/commissions", "Commissions", ADMINS, true, true),
    screen!(AdminAnalytics, "adminAnalytics", "/admin/analytics", "Analytics", ADMINS, true, true),
    screen!(AdminSettings, "adminSettings", "/admin/settings", "Settings", ADMINS, true, true),
    screen!(Login, "login", "/auth/login", "Login", PUBLIC, false, false),
    screen!(Signup, "signup", "/auth/signup", "Signup", PUBLIC, false, false),
    screen!(ResetPassword, "resetPassword", "/auth/reset-password", "Reset Password", PUBLIC, false, false),
];

impl Screen {
    /// Table entry for this screen.
    pub fn spec(self) -> &'static ScreenSpec {
        // SCREENS is declared in variant order.
        &SCREENS[self as usize]
    }

    pub fn key(self) -> &'static str {
        self.spec().key
    }

    /// Resolve a screen key, including legacy aliases (`donors`, `banks`).
    ///
    /// Unknown keys return `None`; the router decides what to do with them.
    pub fn from_key(key: &str) -> Option<Screen> {
        match key {
            "donors" => Some(Screen::DonorSearch),
            "banks" => Some(Screen::BloodBanks),
            other => SCREENS.iter().find(|s| s.key == other).map(|s| s.screen),
        }
    }
}

impl core::fmt::Display for Screen {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.key())
    }
}

/// Reverse lookup from URL path.
pub fn screen_by_path(path: &str) -> Option<&'static ScreenSpec> {
    SCREENS.iter().find(|s| s.path == path)
}

/// Landing screen for a role; `None` (signed out or profile pending) lands on login.
pub fn default_screen(role: Option<Role>) -> Screen {
    match role {
        Some(Role::Donor) => Screen::Home,
        Some(Role::Hospital) => Screen::HospitalDashboard,
        Some(Role::Agent) => Screen::AgentDashboard,
        Some(Role::Admin) => Screen::AdminDashboard,
        None => Screen::Login,
    }
}

/// Every screen a role may open (ignoring authentication).
pub fn accessible_screens(role: Role) -> Vec<Screen> {
    SCREENS
        .iter()
        .filter(|s| (!s.admin_only || role.is_admin()) && s.allows(Some(role)))
        .map(|s| s.screen)
        .collect()
}
