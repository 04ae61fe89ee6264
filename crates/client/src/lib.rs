//! Session coordination around the router and search.
//!
//! Talks to the hosted backend and the device only through the traits in
//! [`ports`]; [`memory`] provides in-memory implementations.

use std::sync::{Mutex, MutexGuard, PoisonError};

pub mod config;
pub mod coordinator;
pub mod location;
pub mod memory;
pub mod ports;
pub mod profile;
pub mod retry;

pub use config::ClientConfig;
pub use coordinator::{Coordinator, CoordinatorError, Discovery, Ports, ProfileStatus};
pub use location::{LocationFix, LocationSource, LocationState};
pub use ports::{
    CandidateHints, CandidateStore, GeocodeError, Geocoder, GeolocationProvider, LocationError, Place,
    Profile, ProfileStore, ProfileUpdate, StoreError,
};
pub use profile::{ProfileError, load_profile};
pub use retry::RetryPolicy;

/// Lock, ignoring poisoning.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
