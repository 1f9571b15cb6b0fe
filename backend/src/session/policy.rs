use chrono::{DateTime, Duration, Utc};

use crate::config::Config;
use crate::session::token::SessionClaims;

/// Derived session state, recomputed on demand and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionStatus {
    pub is_active: bool,
    /// Issued-at of the underlying token, unix seconds.
    pub last_activity: i64,
    /// Time remaining before expiry, floored at zero.
    pub time_until_expiry: Duration,
    /// Only meaningful while `is_active`.
    pub is_expiring_soon: bool,
    /// The token outlived the re-validation horizon and should be replaced.
    /// Distinct from expiry; unreachable under a 30-minute max age but kept
    /// correct for deployments with longer lifetimes.
    pub needs_reissue: bool,
}

/// Pure rules computing session validity, expiry, and warning state from a
/// token's issued-at and an injected `now`.
#[derive(Debug, Clone, Copy)]
pub struct SessionPolicy {
    max_age: Duration,
    update_age: Duration,
    warning_threshold: Duration,
}

impl SessionPolicy {
    pub fn new(max_age: Duration, update_age: Duration, warning_threshold: Duration) -> Self {
        Self {
            max_age,
            update_age,
            warning_threshold,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.max_age(),
            config.update_age(),
            config.warning_threshold(),
        )
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    pub fn evaluate(&self, claims: &SessionClaims, now: DateTime<Utc>) -> SessionStatus {
        let age = Duration::seconds(now.timestamp() - claims.iat);
        let time_until_expiry = (self.max_age - age).max(Duration::zero());
        let is_active = time_until_expiry > Duration::zero();

        SessionStatus {
            is_active,
            last_activity: claims.iat,
            time_until_expiry,
            is_expiring_soon: is_active && time_until_expiry <= self.warning_threshold,
            needs_reissue: age > self.update_age,
        }
    }
}
