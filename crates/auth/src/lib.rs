//! `bloodlink-auth` — role-gated screen routing (pure, no IO).
//!
//! This crate is intentionally decoupled from the UI and the backend: it maps a
//! [`Session`] and a requested [`Screen`] to a [`RouteDecision`].

pub mod navigation;
pub mod roles;
pub mod router;
pub mod screens;
pub mod session;

pub use navigation::{NavItem, NavOutcome, activate, navigation_items};
pub use roles::Role;
pub use router::{
    AccessSignal, Breadcrumb, GateRule, RouteDecision, RouteExplanation, breadcrumbs, can_access,
    explain, route, route_key,
};
pub use screens::{SCREENS, Screen, ScreenSpec, accessible_screens, default_screen, screen_by_path};
pub use session::{AuthState, Session, SessionGeneration, SessionTracker, TransitionError};
