//! Client tunables, read from the environment.

use std::str::FromStr;
use std::time::Duration;

use crate::retry::RetryPolicy;

pub const ENV_RETRY_ATTEMPTS: &str = "BLOODLINK_PROFILE_RETRY_ATTEMPTS";
pub const ENV_RETRY_BASE_MS: &str = "BLOODLINK_PROFILE_RETRY_BASE_MS";
pub const ENV_RETRY_MAX_MS: &str = "BLOODLINK_PROFILE_RETRY_MAX_MS";
pub const ENV_GEOLOCATION_TIMEOUT_MS: &str = "BLOODLINK_GEOLOCATION_TIMEOUT_MS";
pub const ENV_DEFAULT_RADIUS_KM: &str = "BLOODLINK_DEFAULT_RADIUS_KM";

/// Default radius for donor searches.
pub const DEFAULT_RADIUS_KM: f64 = 50.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub profile_retry: RetryPolicy,
    pub geolocation_timeout: Duration,
    pub default_radius_km: f64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            profile_retry: RetryPolicy::default(),
            geolocation_timeout: Duration::from_secs(10),
            default_radius_km: DEFAULT_RADIUS_KM,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unset keys keep their default;
    /// unparsable or out-of-range values are logged and ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let attempts = read(&lookup, ENV_RETRY_ATTEMPTS, defaults.profile_retry.max_attempts, |n| *n >= 1);
        let base_ms = read(
            &lookup,
            ENV_RETRY_BASE_MS,
            millis(defaults.profile_retry.base_delay),
            |_| true,
        );
        let max_ms = read(
            &lookup,
            ENV_RETRY_MAX_MS,
            millis(defaults.profile_retry.max_delay),
            |ms| *ms >= base_ms,
        );
        let timeout_ms = read(
            &lookup,
            ENV_GEOLOCATION_TIMEOUT_MS,
            millis(defaults.geolocation_timeout),
            |ms| *ms > 0,
        );
        let radius = read(&lookup, ENV_DEFAULT_RADIUS_KM, defaults.default_radius_km, |km: &f64| {
            km.is_finite() && *km > 0.0
        });

        Self {
            profile_retry: RetryPolicy {
                max_attempts: attempts,
                base_delay: Duration::from_millis(base_ms),
                max_delay: Duration::from_millis(max_ms),
            },
            geolocation_timeout: Duration::from_millis(timeout_ms),
            default_radius_km: radius,
        }
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

fn read<F, T, V>(lookup: &F, key: &str, default: T, valid: V) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Copy + std::fmt::Debug,
    V: Fn(&T) -> bool,
{
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().parse::<T>() {
        Ok(value) if valid(&value) => value,
        _ => {
            tracing::warn!(key, value = %raw, ?default, "config: invalid value, using default");
            default
        }
    }
}
