//! Session lifecycle configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::domain::session::SessionConfig;

/// Session configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SessionSettings {
    /// Lifetime of a new session in seconds
    #[serde(default = "default_duration")]
    pub duration_secs: u64,

    /// Fresh lifetime granted on extension in seconds
    #[serde(default = "default_duration")]
    pub extension_secs: u64,

    /// Extend sessions that are validated close to expiry
    #[serde(default = "default_true")]
    pub extension_enabled: bool,

    /// Concurrent sessions per user (0 = unlimited)
    #[serde(default = "default_max_sessions")]
    pub max_sessions_per_user: u32,

    /// Reject sessions whose IP or user agent changed
    #[serde(default)]
    pub enforce_security_context: bool,

    /// Interval between expired-session sweeps in seconds
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_secs: u64,
}

impl SessionSettings {
    /// Build the policy handed to the session validator
    pub fn to_session_config(&self) -> SessionConfig {
        SessionConfig {
            default_duration: seconds(self.duration_secs),
            extension_duration: seconds(self.extension_secs),
            extension_enabled: self.extension_enabled,
            max_sessions_per_user: self.max_sessions_per_user,
            enforce_security_context: self.enforce_security_context,
        }
    }

    /// Get cleanup interval as Duration
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }

    /// Validate session configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.duration_secs == 0 {
            return Err(ValidationError::ZeroDuration("session.duration_secs"));
        }
        if self.extension_enabled && self.extension_secs == 0 {
            return Err(ValidationError::ZeroDuration("session.extension_secs"));
        }
        if self.cleanup_interval_secs == 0 {
            return Err(ValidationError::ZeroDuration("session.cleanup_interval_secs"));
        }
        Ok(())
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            duration_secs: default_duration(),
            extension_secs: default_duration(),
            extension_enabled: true,
            max_sessions_per_user: default_max_sessions(),
            enforce_security_context: false,
            cleanup_interval_secs: default_cleanup_interval(),
        }
    }
}

/// Upper bound for any configured lifetime (ten years).
const MAX_LIFETIME_SECS: u64 = 10 * 365 * 24 * 60 * 60;

fn seconds(secs: u64) -> chrono::Duration {
    chrono::Duration::seconds(secs.min(MAX_LIFETIME_SECS) as i64)
}

fn default_duration() -> u64 {
    24 * 60 * 60
}

fn default_true() -> bool {
    true
}

fn default_max_sessions() -> u32 {
    5
}

fn default_cleanup_interval() -> u64 {
    60 * 60
}
