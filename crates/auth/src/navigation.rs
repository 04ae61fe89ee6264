//! Bottom navigation items per session.
//!
//! Items gated on authentication stay in the list for sessions without a role
//! (signed out, or signed in with the profile still loading) but are marked
//! disabled, so the feature is visible; activating one asks for a login
//! instead of navigating.

use serde::Serialize;

use crate::router::{AccessSignal, RouteDecision, route};
use crate::{Role, Screen, Session};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavItem {
    pub screen: Screen,
    pub label: &'static str,
    pub icon: &'static str,
    pub requires_auth: bool,
    pub enabled: bool,
    pub badge: Option<String>,
}

#[derive(Debug, Copy, Clone)]
struct NavEntry {
    screen: Screen,
    label: &'static str,
    icon: &'static str,
    requires_auth: bool,
}

const fn entry(screen: Screen, label: &'static str, icon: &'static str) -> NavEntry {
    NavEntry {
        screen,
        label,
        icon,
        requires_auth: false,
    }
}

const fn gated(screen: Screen, label: &'static str, icon: &'static str) -> NavEntry {
    NavEntry {
        screen,
        label,
        icon,
        requires_auth: true,
    }
}

const BASE: &[NavEntry] = &[
    entry(Screen::Home, "Home", "Home"),
    entry(Screen::DonorSearch, "Find Donors", "Users"),
    entry(Screen::Hospitals, "Hospitals", "Building"),
    gated(Screen::Profile, "Profile", "Users"),
    gated(Screen::Messages, "Messages", "MessageCircle"),
];

const HOSPITAL: &[NavEntry] = &[
    entry(Screen::HospitalDashboard, "Hospital", "LayoutDashboard"),
    entry(Screen::HospitalRequests, "Requests", "Users"),
    entry(Screen::HospitalSubscription, "Subscription", "Heart"),
];

const AGENT: &[NavEntry] = &[
    entry(Screen::AgentDashboard, "Agent", "LayoutDashboard"),
    entry(Screen::AgentReferrals, "Referrals", "UserPlus"),
    entry(Screen::AgentCommissions, "Commissions", "TrendingUp"),
    entry(Screen::AgentEarnings, "Earnings", "IndianRupee"),
];

const ADMIN: &[NavEntry] = &[
    entry(Screen::AdminDashboard, "Admin", "LayoutDashboard"),
    entry(Screen::AdminUsers, "Users", "Users"),
    entry(Screen::AdminHospitals, "Hospitals", "Building"),
    entry(Screen::AdminAgents, "Agents", "UserCheck"),
    entry(Screen::AdminDonations, "Donations", "Heart"),
];

fn role_entries(role: Option<Role>) -> &'static [NavEntry] {
    match role {
        Some(Role::Hospital) => HOSPITAL,
        Some(Role::Agent) => AGENT,
        Some(Role::Admin) => ADMIN,
        Some(Role::Donor) | None => &[],
    }
}

/// Navigation for the session: the shared base set, then the role's own items.
///
/// Recompute whenever the session's role changes.
pub fn navigation_items(session: &Session, unread_messages: u32) -> Vec<NavItem> {
    BASE.iter()
        .chain(role_entries(session.effective_role()))
        .map(|e| NavItem {
            screen: e.screen,
            label: e.label,
            icon: e.icon,
            requires_auth: e.requires_auth,
            enabled: !(e.requires_auth && session.effective_role().is_none()),
            badge: (e.screen == Screen::Messages && unread_messages > 0)
                .then(|| unread_messages.to_string()),
        })
        .collect()
}

/// Result of tapping a navigation item.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NavOutcome {
    /// Locked item: show the login prompt, stay on the current screen.
    PromptLogin,
    Navigate(RouteDecision),
}

/// Activate `item` for `session`.
pub fn activate(item: &NavItem, session: &Session) -> NavOutcome {
    if !item.enabled || (item.requires_auth && session.effective_role().is_none()) {
        tracing::debug!(screen = %item.screen, "nav: locked item tapped");
        return NavOutcome::PromptLogin;
    }
    match route(session, item.screen) {
        RouteDecision::Redirect {
            signal: AccessSignal::AuthRequired,
            ..
        } => NavOutcome::PromptLogin,
        decision => NavOutcome::Navigate(decision),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screens(items: &[NavItem]) -> Vec<Screen> {
        items.iter().map(|i| i.screen).collect()
    }

    #[test]
    fn anonymous_sees_locked_items() {
        let items = navigation_items(&Session::anonymous(), 0);
        assert_eq!(items.len(), BASE.len());

        let profile = items.iter().find(|i| i.screen == Screen::Profile).unwrap();
        assert!(!profile.enabled);
        let home = items.iter().find(|i| i.screen == Screen::Home).unwrap();
        assert!(home.enabled);
    }

    #[test]
    fn locked_item_prompts_login() {
        let session = Session::anonymous();
        let items = navigation_items(&session, 0);
        let messages = items.iter().find(|i| i.screen == Screen::Messages).unwrap();
        assert_eq!(activate(messages, &session), NavOutcome::PromptLogin);
    }

    #[test]
    fn hospital_gets_role_items_after_base() {
        let items = navigation_items(&Session::with_role(Role::Hospital), 0);
        assert_eq!(
            &screens(&items)[BASE.len()..],
            &[
                Screen::HospitalDashboard,
                Screen::HospitalRequests,
                Screen::HospitalSubscription
            ]
        );
        assert!(items.iter().all(|i| i.enabled));
    }

    #[test]
    fn donor_gets_base_only() {
        let items = navigation_items(&Session::with_role(Role::Donor), 0);
        assert_eq!(items.len(), BASE.len());
    }

    #[test]
    fn pending_profile_gets_base_only() {
        let items = navigation_items(&Session::pending_profile(), 0);
        assert_eq!(items.len(), BASE.len());
        for item in &items {
            assert_eq!(item.enabled, !item.requires_auth, "{}", item.screen);
        }
        let home = items.iter().find(|i| i.screen == Screen::Home).unwrap();
        assert!(home.enabled);
        let profile = items.iter().find(|i| i.screen == Screen::Profile).unwrap();
        assert!(!profile.enabled);
    }

    #[test]
    fn pending_profile_locked_item_prompts_login() {
        let session = Session::pending_profile();
        let items = navigation_items(&session, 0);
        for screen in [Screen::Profile, Screen::Messages] {
            let item = items.iter().find(|i| i.screen == screen).unwrap();
            assert_eq!(activate(item, &session), NavOutcome::PromptLogin);
        }
    }

    #[test]
    fn unread_badge_on_messages() {
        let items = navigation_items(&Session::with_role(Role::Donor), 3);
        let messages = items.iter().find(|i| i.screen == Screen::Messages).unwrap();
        assert_eq!(messages.badge.as_deref(), Some("3"));
        assert!(items.iter().filter(|i| i.badge.is_some()).count() == 1);
    }

    #[test]
    fn activating_role_item_routes() {
        let session = Session::with_role(Role::Agent);
        let items = navigation_items(&session, 0);
        let earnings = items.iter().find(|i| i.screen == Screen::AgentEarnings).unwrap();
        assert_eq!(
            activate(earnings, &session),
            NavOutcome::Navigate(RouteDecision::Render {
                screen: Screen::AgentEarnings
            })
        );
    }

    #[test]
    fn anonymous_home_tap_still_goes_through_router() {
        // Home is visible and enabled, but the route itself needs a session.
        let session = Session::anonymous();
        let items = navigation_items(&session, 0);
        let home = items.iter().find(|i| i.screen == Screen::Home).unwrap();
        assert_eq!(activate(home, &session), NavOutcome::PromptLogin);
    }
}
