//! Session lifetime and capacity policy.

use chrono::Duration;

/// Minutes before expiry at which a validated session becomes eligible
/// for extension.
pub const EXTENSION_THRESHOLD_MINUTES: i64 = 15;

/// Lifetime, extension, capacity and fingerprint rules for sessions.
///
/// Built from configuration (`config::SessionSettings`) and handed to each
/// validator instance; there is no process-wide default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Lifetime of a newly created session.
    pub default_duration: Duration,

    /// Fresh lifetime granted when a session is extended.
    pub extension_duration: Duration,

    /// Whether validation may extend sessions close to expiry.
    pub extension_enabled: bool,

    /// Maximum concurrently active sessions per user (0 disables the cap).
    pub max_sessions_per_user: u32,

    /// Whether an IP/user agent mismatch rejects the session.
    pub enforce_security_context: bool,
}

impl SessionConfig {
    /// Look-ahead window used by the extension policy.
    pub fn extension_threshold() -> Duration {
        Duration::minutes(EXTENSION_THRESHOLD_MINUTES)
    }

    /// Returns the cap if one is configured.
    pub fn session_cap(&self) -> Option<u32> {
        (self.max_sessions_per_user > 0).then_some(self.max_sessions_per_user)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_duration: Duration::hours(24),
            extension_duration: Duration::hours(24),
            extension_enabled: true,
            max_sessions_per_user: 5,
            enforce_security_context: false,
        }
    }
}
