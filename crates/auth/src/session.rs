//! Session value and the sign-in state machine.
//!
//! The router only ever sees a [`Session`] snapshot. [`SessionTracker`] owns the
//! transitions and hands out a [`SessionGeneration`] ticket with every sign-in
//! so that late async results (profile fetches, location lookups) can be
//! checked for relevance before they are applied.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use bloodlink_core::UserId;

use crate::Role;

/// Router input: who is asking.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Session {
    pub authenticated: bool,
    pub role: Option<Role>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Credentials accepted, profile not loaded yet.
    pub fn pending_profile() -> Self {
        Self {
            authenticated: true,
            role: None,
        }
    }

    pub fn with_role(role: Role) -> Self {
        Self {
            authenticated: true,
            role: Some(role),
        }
    }

    /// Effective role for gating: a role is only honoured on an authenticated session.
    pub fn effective_role(&self) -> Option<Role> {
        if self.authenticated { self.role } else { None }
    }
}

/// Monotonic ticket identifying one sign-in (or sign-out) epoch.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionGeneration(u64);

impl SessionGeneration {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Sign-in lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    AuthenticatedNoProfile {
        user_id: UserId,
        since: DateTime<Utc>,
    },
    AuthenticatedWithRole {
        user_id: UserId,
        role: Role,
        since: DateTime<Utc>,
    },
}

impl AuthState {
    pub fn user_id(&self) -> Option<UserId> {
        match self {
            AuthState::Unauthenticated => None,
            AuthState::AuthenticatedNoProfile { user_id, .. }
            | AuthState::AuthenticatedWithRole { user_id, .. } => Some(*user_id),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransitionError {
    /// The result belongs to an earlier sign-in epoch and must be dropped.
    #[error("stale response (issued for generation {issued}, current {current})")]
    Stale { issued: u64, current: u64 },

    #[error("no user is signed in")]
    NotSignedIn,

    #[error("profile belongs to a different user")]
    UserMismatch,
}

/// Owns the [`AuthState`] and its generation counter.
#[derive(Debug, Clone)]
pub struct SessionTracker {
    state: AuthState,
    generation: SessionGeneration,
}

impl Default for SessionTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionTracker {
    pub fn new() -> Self {
        Self {
            state: AuthState::Unauthenticated,
            generation: SessionGeneration(0),
        }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn generation(&self) -> SessionGeneration {
        self.generation
    }

    pub fn session(&self) -> Session {
        match &self.state {
            AuthState::Unauthenticated => Session::anonymous(),
            AuthState::AuthenticatedNoProfile { .. } => Session::pending_profile(),
            AuthState::AuthenticatedWithRole { role, .. } => Session::with_role(*role),
        }
    }

    /// `Unauthenticated → AuthenticatedNoProfile`, immediately on credential acceptance.
    ///
    /// Signing in as someone else while already signed in starts a new epoch too.
    pub fn sign_in(&mut self, user_id: UserId, now: DateTime<Utc>) -> SessionGeneration {
        if self.state.user_id() == Some(user_id) {
            return self.generation;
        }
        self.bump();
        self.state = AuthState::AuthenticatedNoProfile { user_id, since: now };
        tracing::debug!(%user_id, generation = self.generation.0, "session: credentials accepted");
        self.generation
    }

    /// Apply a resolved profile fetch.
    ///
    /// Also used for role changes on an already loaded profile.
    pub fn profile_loaded(
        &mut self,
        ticket: SessionGeneration,
        user_id: UserId,
        role: Role,
    ) -> Result<(), TransitionError> {
        self.check_ticket(ticket)?;
        let since = match &self.state {
            AuthState::Unauthenticated => return Err(TransitionError::NotSignedIn),
            AuthState::AuthenticatedNoProfile { user_id: current, since }
            | AuthState::AuthenticatedWithRole { user_id: current, since, .. } => {
                if *current != user_id {
                    return Err(TransitionError::UserMismatch);
                }
                *since
            }
        };
        self.state = AuthState::AuthenticatedWithRole {
            user_id,
            role,
            since,
        };
        tracing::debug!(%user_id, %role, "session: profile loaded");
        Ok(())
    }

    /// Back to `Unauthenticated` from any state. Invalidates outstanding tickets.
    pub fn sign_out(&mut self) {
        if self.state != AuthState::Unauthenticated {
            tracing::debug!(generation = self.generation.0, "session: signed out");
        }
        self.bump();
        self.state = AuthState::Unauthenticated;
    }

    /// Whether a result issued under `ticket` may still be applied.
    pub fn check_ticket(&self, ticket: SessionGeneration) -> Result<(), TransitionError> {
        if ticket == self.generation {
            Ok(())
        } else {
            tracing::warn!(
                issued = ticket.0,
                current = self.generation.0,
                "session: discarding stale response"
            );
            Err(TransitionError::Stale {
                issued: ticket.0,
                current: self.generation.0,
            })
        }
    }

    fn bump(&mut self) {
        self.generation = SessionGeneration(self.generation.0 + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_in_enters_pending_profile() {
        let mut tracker = SessionTracker::new();
        let user = UserId::new();
        tracker.sign_in(user, Utc::now());

        assert_eq!(tracker.session(), Session::pending_profile());
        assert_eq!(tracker.state().user_id(), Some(user));
    }

    #[test]
    fn profile_load_completes_sign_in() {
        let mut tracker = SessionTracker::new();
        let user = UserId::new();
        let ticket = tracker.sign_in(user, Utc::now());

        tracker.profile_loaded(ticket, user, Role::Hospital).unwrap();
        assert_eq!(tracker.session(), Session::with_role(Role::Hospital));
    }

    #[test]
    fn profile_after_sign_out_is_stale() {
        let mut tracker = SessionTracker::new();
        let user = UserId::new();
        let ticket = tracker.sign_in(user, Utc::now());
        tracker.sign_out();

        let err = tracker.profile_loaded(ticket, user, Role::Admin).unwrap_err();
        assert!(matches!(err, TransitionError::Stale { .. }));
        assert_eq!(tracker.session(), Session::anonymous());
    }

    #[test]
    fn profile_from_previous_user_is_stale() {
        let mut tracker = SessionTracker::new();
        let alice = UserId::new();
        let bob = UserId::new();
        let alice_ticket = tracker.sign_in(alice, Utc::now());
        tracker.sign_out();
        let bob_ticket = tracker.sign_in(bob, Utc::now());

        assert!(tracker.profile_loaded(alice_ticket, alice, Role::Admin).is_err());
        assert_eq!(tracker.session(), Session::pending_profile());

        tracker.profile_loaded(bob_ticket, bob, Role::Donor).unwrap();
        assert_eq!(tracker.session(), Session::with_role(Role::Donor));
    }

    #[test]
    fn repeated_sign_in_for_same_user_keeps_ticket() {
        let mut tracker = SessionTracker::new();
        let user = UserId::new();
        let first = tracker.sign_in(user, Utc::now());
        let second = tracker.sign_in(user, Utc::now());
        assert_eq!(first, second);
    }

    #[test]
    fn role_change_on_loaded_profile() {
        let mut tracker = SessionTracker::new();
        let user = UserId::new();
        let ticket = tracker.sign_in(user, Utc::now());
        tracker.profile_loaded(ticket, user, Role::Donor).unwrap();
        tracker.profile_loaded(ticket, user, Role::Agent).unwrap();
        assert_eq!(tracker.session().role, Some(Role::Agent));
    }

    #[test]
    fn mismatched_user_is_rejected() {
        let mut tracker = SessionTracker::new();
        let ticket = tracker.sign_in(UserId::new(), Utc::now());
        let err = tracker
            .profile_loaded(ticket, UserId::new(), Role::Admin)
            .unwrap_err();
        assert_eq!(err, TransitionError::UserMismatch);
    }

    #[test]
    fn role_on_unauthenticated_session_is_ignored() {
        let forged = Session {
            authenticated: false,
            role: Some(Role::Admin),
        };
        assert_eq!(forged.effective_role(), None);
    }
}
