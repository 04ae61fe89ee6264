//! Profile loading after sign-in.
//!
//! The profile row is written by a backend trigger when the account is
//! created, so right after sign-up the fetch can legitimately come back empty.
//! Empty results and transient failures are retried with [`RetryPolicy`].

use thiserror::Error;

use bloodlink_core::UserId;

use crate::ports::{Profile, ProfileStore, StoreError};
use crate::retry::RetryPolicy;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProfileError {
    /// No row after every attempt; the session stays without a role.
    #[error("profile not available for user {0}")]
    Missing(UserId),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ProfileError {
    fn is_retryable(&self) -> bool {
        match self {
            ProfileError::Missing(_) => true,
            ProfileError::Store(StoreError::NotFound | StoreError::Unavailable(_)) => true,
            ProfileError::Store(StoreError::Rejected(_)) => false,
        }
    }
}

/// Fetch `user_id`'s profile, retrying per `policy`.
pub async fn load_profile(
    store: &dyn ProfileStore,
    user_id: UserId,
    policy: &RetryPolicy,
) -> Result<Profile, ProfileError> {
    policy
        .run(
            "profile fetch",
            |_| async move {
                match store.fetch_profile(user_id).await {
                    Ok(Some(profile)) => Ok(profile),
                    Ok(None) => Err(ProfileError::Missing(user_id)),
                    Err(err) => Err(ProfileError::Store(err)),
                }
            },
            ProfileError::is_retryable,
        )
        .await
}
