use crate::utils::cookies::SameSite;
use anyhow::anyhow;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub session_secret: String,
    /// Absolute token lifetime, in minutes.
    pub session_max_age_minutes: u64,
    /// Horizon after which a still-valid token is re-signed, in hours.
    pub session_update_age_hours: u64,
    /// How close to expiry the warning state begins, in minutes.
    pub session_warning_minutes: u64,
    pub cookie_secure: bool,
    pub cookie_same_site: SameSite,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let session_secret = env::var("SESSION_SECRET")
            .unwrap_or_else(|_| "your-secret-key-change-this-in-production".to_string());

        let session_max_age_minutes = env::var("SESSION_MAX_AGE_MINUTES")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30);

        let session_update_age_hours = env::var("SESSION_UPDATE_AGE_HOURS")
            .unwrap_or_else(|_| "24".to_string())
            .parse()
            .unwrap_or(24);

        let session_warning_minutes = env::var("SESSION_WARNING_MINUTES")
            .unwrap_or_else(|_| "5".to_string())
            .parse()
            .unwrap_or(5);

        if session_warning_minutes >= session_max_age_minutes {
            return Err(anyhow!(
                "SESSION_WARNING_MINUTES ({}) must be shorter than SESSION_MAX_AGE_MINUTES ({})",
                session_warning_minutes,
                session_max_age_minutes
            ));
        }

        let cookie_secure = env::var("COOKIE_SECURE")
            .map(|value| value == "true" || value == "1")
            .unwrap_or(false);

        let cookie_same_site = match env::var("COOKIE_SAME_SITE").as_deref() {
            Ok("strict") => SameSite::Strict,
            Ok("none") => SameSite::None,
            _ => SameSite::Lax,
        };

        Ok(Config {
            session_secret,
            session_max_age_minutes,
            session_update_age_hours,
            session_warning_minutes,
            cookie_secure,
            cookie_same_site,
        })
    }

    pub fn max_age(&self) -> Duration {
        Duration::minutes(self.session_max_age_minutes as i64)
    }

    pub fn update_age(&self) -> Duration {
        Duration::hours(self.session_update_age_hours as i64)
    }

    pub fn warning_threshold(&self) -> Duration {
        Duration::minutes(self.session_warning_minutes as i64)
    }
}
