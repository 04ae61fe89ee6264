//! Client-side session coordination.
//!
//! [`Coordinator`] owns the session tracker, the current screen, the loaded
//! profile and the reference location. Every async operation snapshots the
//! session generation before awaiting and re-checks it before applying its
//! result, so a response that lands after sign-out (or after another user
//! signs in) is dropped with [`CoordinatorError::Session`].
//!
//! State sits behind a `std::sync::Mutex` that is never held across `.await`.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;

use bloodlink_auth::{
    AuthState, NavItem, Role, RouteDecision, Screen, Session, SessionGeneration, SessionTracker,
    TransitionError, default_screen, navigation_items, route, route_key,
};
use bloodlink_core::UserId;
use bloodlink_discovery::{CandidateKind, SearchFilters, SearchOutcome, proximity_search};

use crate::config::ClientConfig;
use crate::location::{self, LocationFix, LocationState};
use crate::lock;
use crate::ports::{
    CandidateHints, CandidateStore, GeocodeError, Geocoder, GeolocationProvider, Place, Profile,
    ProfileStore, ProfileUpdate, StoreError,
};
use crate::profile::{ProfileError, load_profile};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoordinatorError {
    /// Stale result, or no suitable session for the operation.
    #[error(transparent)]
    Session(#[from] TransitionError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Geocode(#[from] GeocodeError),
}

impl CoordinatorError {
    /// The session changed while the operation was in flight.
    pub fn is_superseded(&self) -> bool {
        matches!(self, CoordinatorError::Session(TransitionError::Stale { .. }))
    }
}

/// Collaborators injected into the coordinator.
#[derive(Clone)]
pub struct Ports {
    pub profiles: Arc<dyn ProfileStore>,
    pub candidates: Arc<dyn CandidateStore>,
    pub geolocation: Arc<dyn GeolocationProvider>,
    pub geocoder: Arc<dyn Geocoder>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProfileStatus {
    /// Role known; the client now shows `screen`.
    Ready { role: Role, screen: Screen },
    /// Still no profile row; the session stays without a role.
    Pending,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Discovery {
    /// The router refused the discovery screen.
    Redirected { decision: RouteDecision },
    Results { screen: Screen, outcome: SearchOutcome },
}

#[derive(Debug)]
struct ClientState {
    tracker: SessionTracker,
    profile: Option<Profile>,
    screen: Screen,
    location: LocationState,
    /// Bumped whenever the reference point is replaced outside a device
    /// refresh. Device fixes are checked against it, not the session ticket.
    location_epoch: u64,
    unread_messages: u32,
}

impl ClientState {
    /// Route `screen` for the current session and make the result current.
    fn go(&mut self, screen: Screen) -> RouteDecision {
        let decision = route(&self.tracker.session(), screen);
        self.screen = decision.screen();
        decision
    }

    fn check_location_epoch(&self, issued: u64) -> Result<(), CoordinatorError> {
        if issued == self.location_epoch {
            return Ok(());
        }
        tracing::warn!(issued, current = self.location_epoch, "client: dropping superseded location");
        Err(TransitionError::Stale {
            issued,
            current: self.location_epoch,
        }
        .into())
    }
}

pub struct Coordinator {
    config: ClientConfig,
    ports: Ports,
    state: Mutex<ClientState>,
}

impl Coordinator {
    pub fn new(config: ClientConfig, ports: Ports) -> Self {
        Self {
            config,
            ports,
            state: Mutex::new(ClientState {
                tracker: SessionTracker::new(),
                profile: None,
                screen: default_screen(None),
                location: LocationState::default(),
                location_epoch: 0,
                unread_messages: 0,
            }),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> Session {
        lock(&self.state).tracker.session()
    }

    pub fn auth_state(&self) -> AuthState {
        lock(&self.state).tracker.state().clone()
    }

    pub fn generation(&self) -> SessionGeneration {
        lock(&self.state).tracker.generation()
    }

    pub fn current_screen(&self) -> Screen {
        lock(&self.state).screen
    }

    pub fn profile(&self) -> Option<Profile> {
        lock(&self.state).profile.clone()
    }

    pub fn location(&self) -> LocationState {
        lock(&self.state).location.clone()
    }

    pub fn set_unread_messages(&self, count: u32) {
        lock(&self.state).unread_messages = count;
    }

    /// Navigation items for the current session.
    pub fn navigation(&self) -> Vec<NavItem> {
        let state = lock(&self.state);
        navigation_items(&state.tracker.session(), state.unread_messages)
    }

    /// Route a screen key and make the resulting screen current.
    pub fn navigate(&self, key: &str) -> RouteDecision {
        let mut state = lock(&self.state);
        let decision = route_key(&state.tracker.session(), key);
        state.screen = decision.screen();
        decision
    }

    pub fn navigate_to(&self, screen: Screen) -> RouteDecision {
        lock(&self.state).go(screen)
    }

    /// Credentials accepted for `user_id`: load the profile and land on the
    /// role's default screen.
    pub async fn sign_in(&self, user_id: UserId) -> Result<ProfileStatus, CoordinatorError> {
        let ticket = lock(&self.state).tracker.sign_in(user_id, Utc::now());
        tracing::info!(%user_id, "client: signed in, loading profile");

        let loaded = load_profile(self.ports.profiles.as_ref(), user_id, &self.config.profile_retry).await;
        self.apply_profile(ticket, user_id, loaded, true)
    }

    /// Fetch the profile again, e.g. after an administrator changed the role.
    /// The current screen is re-routed for the new role. A vanished row is
    /// reported as [`StoreError::NotFound`].
    pub async fn reload_profile(&self) -> Result<ProfileStatus, CoordinatorError> {
        let (ticket, user_id) = self.signed_in_user()?;
        let loaded = load_profile(self.ports.profiles.as_ref(), user_id, &self.config.profile_retry).await;
        self.apply_profile(ticket, user_id, loaded, false)
    }

    fn apply_profile(
        &self,
        ticket: SessionGeneration,
        user_id: UserId,
        loaded: Result<Profile, ProfileError>,
        landing: bool,
    ) -> Result<ProfileStatus, CoordinatorError> {
        let mut state = lock(&self.state);
        state.tracker.check_ticket(ticket)?;

        let profile = match loaded {
            Ok(profile) => profile,
            Err(ProfileError::Missing(_)) if !landing => return Err(StoreError::NotFound.into()),
            Err(ProfileError::Missing(_)) => {
                tracing::warn!(%user_id, "client: profile still missing, continuing without role");
                return Ok(ProfileStatus::Pending);
            }
            Err(ProfileError::Store(err)) => return Err(err.into()),
        };

        let role = profile.role;
        state.tracker.profile_loaded(ticket, user_id, role)?;
        if matches!(state.location, LocationState::Unknown { .. })
            && let Some(fix) = location::from_profile(&profile)
        {
            state.location = LocationState::Known { fix };
        }
        state.profile = Some(profile);

        let target = if landing { default_screen(Some(role)) } else { state.screen };
        let screen = state.go(target).screen();
        tracing::info!(%user_id, %role, %screen, "client: profile ready");
        Ok(ProfileStatus::Ready { role, screen })
    }

    /// Sign out from any state. Outstanding async work becomes stale and the
    /// reference point is forgotten.
    pub fn sign_out(&self) -> RouteDecision {
        let mut state = lock(&self.state);
        state.tracker.sign_out();
        state.profile = None;
        state.location = LocationState::default();
        state.location_epoch += 1;
        state.unread_messages = 0;
        tracing::info!("client: signed out");
        state.go(default_screen(None))
    }

    /// Persist a profile edit and mirror it locally.
    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<Profile, CoordinatorError> {
        let (ticket, user_id) = self.signed_in_user()?;
        self.ports.profiles.update_profile(user_id, &update).await?;

        let mut state = lock(&self.state);
        state.tracker.check_ticket(ticket)?;
        let profile = state
            .profile
            .as_mut()
            .ok_or(CoordinatorError::Session(TransitionError::NotSignedIn))?;
        update.apply_to(profile);
        let profile = profile.clone();
        if let Some(fix) = location::from_profile(&profile).filter(|_| update.location.is_some()) {
            state.location = LocationState::Known { fix };
        }
        Ok(profile)
    }

    /// Ask the device for a fresh position. Failure leaves the location unknown.
    ///
    /// The fix survives a sign-in that happens while the device is still
    /// answering; a sign-out or a chosen address supersedes it.
    pub async fn refresh_location(&self) -> Result<LocationState, CoordinatorError> {
        let epoch = lock(&self.state).location_epoch;
        let result = location::acquire(
            self.ports.geolocation.as_ref(),
            self.ports.geocoder.as_ref(),
            self.config.geolocation_timeout,
        )
        .await;

        let mut state = lock(&self.state);
        state.check_location_epoch(epoch)?;
        // A failed refresh keeps an earlier fix, e.g. one the user picked by hand.
        match result {
            Err(err) if state.location.fix().is_some() => {
                tracing::debug!(error = %err, "client: keeping previous location");
            }
            result => state.location = LocationState::from(result),
        }
        Ok(state.location.clone())
    }

    pub async fn suggest_addresses(&self, text: &str) -> Result<Vec<Place>, CoordinatorError> {
        Ok(location::suggest_addresses(self.ports.geocoder.as_ref(), text).await?)
    }

    /// Use a typed address as the reference point.
    pub async fn choose_address(&self, address: &str) -> Result<LocationFix, CoordinatorError> {
        let epoch = lock(&self.state).location_epoch;
        let fix = location::resolve_address(self.ports.geocoder.as_ref(), address).await?;

        let mut state = lock(&self.state);
        state.check_location_epoch(epoch)?;
        state.location_epoch += 1;
        state.location = LocationState::Known { fix: fix.clone() };
        Ok(fix)
    }

    /// Filters a discovery screen opens with: donors are bounded by the
    /// configured radius, facilities are only ranked.
    pub fn default_filters(&self, kind: CandidateKind) -> SearchFilters {
        match kind {
            CandidateKind::Donor => SearchFilters::default().within_km(self.config.default_radius_km),
            CandidateKind::Hospital | CandidateKind::BloodBank => SearchFilters::default(),
        }
    }

    /// Open the discovery screen for `kind` and search a fresh candidate snapshot.
    pub async fn discover(
        &self,
        kind: CandidateKind,
        filters: &SearchFilters,
    ) -> Result<Discovery, CoordinatorError> {
        let screen = discovery_screen(kind);
        let (ticket, origin) = {
            let mut state = lock(&self.state);
            let decision = state.go(screen);
            if !decision.is_render() {
                return Ok(Discovery::Redirected { decision });
            }
            (state.tracker.generation(), state.location.point().copied())
        };

        let hints = CandidateHints {
            blood_group: filters.blood_group,
            available_only: filters.available_only,
        };
        let snapshot = self.ports.candidates.list_candidates(kind, &hints).await?;

        lock(&self.state).tracker.check_ticket(ticket)?;
        let outcome = proximity_search(origin.as_ref(), snapshot, filters);
        tracing::debug!(?kind, results = outcome.len(), origin = ?outcome.origin, "client: discovery");
        Ok(Discovery::Results { screen, outcome })
    }

    fn signed_in_user(&self) -> Result<(SessionGeneration, UserId), CoordinatorError> {
        let state = lock(&self.state);
        let user_id = state.tracker.state().user_id().ok_or(TransitionError::NotSignedIn)?;
        Ok((state.tracker.generation(), user_id))
    }
}

fn discovery_screen(kind: CandidateKind) -> Screen {
    match kind {
        CandidateKind::Donor => Screen::DonorSearch,
        CandidateKind::Hospital => Screen::Hospitals,
        CandidateKind::BloodBank => Screen::BloodBanks,
    }
}
