//! Access router: session + requested screen → render or redirect.
//!
//! - No IO
//! - No panics
//! - Never errors: every failure resolves to a redirect decision

use serde::Serialize;

use crate::screens::{ScreenSpec, default_screen, screen_by_path};
use crate::{Role, Screen, Session};

/// Why a request was redirected.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessSignal {
    /// Screen needs a signed-in user; the client shows the login prompt.
    AuthRequired,
    /// Signed in, but the role may not open the screen.
    RoleForbidden,
}

/// Gate rule that produced a decision.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GateRule {
    RequiresAuth,
    AdminOnly,
    AllowedRoles,
    Open,
}

/// Outcome of a routing request.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum RouteDecision {
    Render { screen: Screen },
    Redirect { to: Screen, signal: AccessSignal },
}

impl RouteDecision {
    /// Screen the client ends up showing.
    pub fn screen(&self) -> Screen {
        match self {
            RouteDecision::Render { screen } => *screen,
            RouteDecision::Redirect { to, .. } => *to,
        }
    }

    pub fn signal(&self) -> Option<AccessSignal> {
        match self {
            RouteDecision::Render { .. } => None,
            RouteDecision::Redirect { signal, .. } => Some(*signal),
        }
    }

    pub fn is_render(&self) -> bool {
        matches!(self, RouteDecision::Render { .. })
    }
}

/// Evaluate the gate rules in order; first match wins.
fn evaluate(session: &Session, spec: &ScreenSpec) -> (GateRule, RouteDecision) {
    let role = session.effective_role();

    if spec.requires_auth && !session.authenticated {
        return (
            GateRule::RequiresAuth,
            RouteDecision::Redirect {
                to: Screen::Login,
                signal: AccessSignal::AuthRequired,
            },
        );
    }

    if spec.admin_only && role != Some(Role::Admin) {
        return (
            GateRule::AdminOnly,
            RouteDecision::Redirect {
                to: default_screen(role),
                signal: AccessSignal::RoleForbidden,
            },
        );
    }

    if !spec.allows(role) {
        return (
            GateRule::AllowedRoles,
            RouteDecision::Redirect {
                to: default_screen(role),
                signal: AccessSignal::RoleForbidden,
            },
        );
    }

    (GateRule::Open, RouteDecision::Render { screen: spec.screen })
}

/// Route a typed screen request.
pub fn route(session: &Session, requested: Screen) -> RouteDecision {
    let (rule, decision) = evaluate(session, requested.spec());
    if let RouteDecision::Redirect { to, signal } = decision {
        tracing::debug!(
            requested = %requested,
            redirect_to = %to,
            ?signal,
            ?rule,
            role = ?session.role,
            "router: redirect"
        );
    }
    decision
}

/// Route a screen key coming from the UI.
///
/// Unknown keys are treated as a request for the role's default screen.
pub fn route_key(session: &Session, requested: &str) -> RouteDecision {
    match Screen::from_key(requested) {
        Some(screen) => route(session, screen),
        None => {
            tracing::debug!(requested, "router: unknown screen key, using default");
            route(session, default_screen(session.effective_role()))
        }
    }
}

/// Whether the session may open `screen` without being redirected.
pub fn can_access(session: &Session, screen: Screen) -> bool {
    evaluate(session, screen.spec()).1.is_render()
}

// ─────────────────────────────────────────────────────────────────────────────
// Decision explanation (audit trail)
// ─────────────────────────────────────────────────────────────────────────────

/// Auditable explanation of a routing decision.
#[derive(Debug, Clone, Serialize)]
pub struct RouteExplanation {
    pub requested: Screen,
    pub granted: bool,
    pub rule: GateRule,
    pub decision: RouteDecision,
    pub reason: String,
    pub session: Session,
}

/// Explain why `requested` would render or redirect for `session`.
pub fn explain(session: &Session, requested: Screen) -> RouteExplanation {
    let spec = requested.spec();
    let (rule, decision) = evaluate(session, spec);

    let reason = match rule {
        GateRule::RequiresAuth => format!("'{}' requires a signed-in user", spec.key),
        GateRule::AdminOnly => match session.effective_role() {
            Some(role) => format!("'{}' is admin-only; session role is '{role}'", spec.key),
            None => format!("'{}' is admin-only; session has no role yet", spec.key),
        },
        GateRule::AllowedRoles => {
            let allowed: Vec<&str> = spec.allowed_roles.iter().map(|r| r.as_str()).collect();
            match session.effective_role() {
                Some(role) => format!(
                    "'{}' allows roles {allowed:?}; session role is '{role}'",
                    spec.key
                ),
                None => format!(
                    "'{}' allows roles {allowed:?}; session has no role yet",
                    spec.key
                ),
            }
        }
        GateRule::Open => format!("'{}' is open to this session", spec.key),
    };

    RouteExplanation {
        requested,
        granted: decision.is_render(),
        rule,
        decision,
        reason,
        session: *session,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Breadcrumbs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    pub label: String,
    pub path: Option<&'static str>,
}

/// Home, then the role section for non-donor roles, then the current page.
pub fn breadcrumbs(path: &str, role: Option<Role>) -> Vec<Breadcrumb> {
    let mut crumbs = vec![Breadcrumb {
        label: "Home".to_string(),
        path: Some(Screen::Home.spec().path),
    }];

    if let Some(role) = role.filter(|r| *r != Role::Donor) {
        crumbs.push(Breadcrumb {
            label: role.label().to_string(),
            path: Some(default_screen(Some(role)).spec().path),
        });
    }

    if let Some(spec) = screen_by_path(path).filter(|s| s.screen != Screen::Home) {
        crumbs.push(Breadcrumb {
            label: spec.title.to_string(),
            path: Some(spec.path),
        });
    }

    crumbs
}
