//! Client-side session status, recomputed on demand from the last-activity
//! instant. Mirrors the server policy computation; duplicated on this side of
//! the split deliberately, like the rest of the API types.

use tokio::time::{Duration, Instant};

use crate::monitor::MonitorConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionStatus {
    pub is_active: bool,
    pub time_until_expiry: Duration,
    /// Only meaningful while `is_active`.
    pub is_expiring_soon: bool,
}

/// Pure computation from elapsed idle time.
pub fn evaluate(idle: Duration, config: &MonitorConfig) -> SessionStatus {
    let time_until_expiry = config.max_age.saturating_sub(idle);
    let is_active = time_until_expiry > Duration::ZERO;
    SessionStatus {
        is_active,
        time_until_expiry,
        is_expiring_soon: is_active && time_until_expiry <= config.warning_threshold,
    }
}

/// Tracks the last-activity instant and derives [`SessionStatus`] against the
/// current clock. Never stored; the countdown notice polls it.
#[derive(Debug, Clone)]
pub struct ActivityTracker {
    config: MonitorConfig,
    last_activity: Instant,
}

impl ActivityTracker {
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            config,
            last_activity: Instant::now(),
        }
    }

    pub fn record_activity(&mut self) {
        self.last_activity = Instant::now();
    }

    pub fn last_activity(&self) -> Instant {
        self.last_activity
    }

    pub fn status(&self) -> SessionStatus {
        evaluate(self.last_activity.elapsed(), &self.config)
    }
}
