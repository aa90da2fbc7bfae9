//! Rate limiter thresholds and named presets.

use std::time::Duration;
use thiserror::Error;

/// Thresholds for one action class (login, registration, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimiterConfig {
    /// Attempts permitted within one window.
    pub max_attempts: u32,
    /// Length of the sliding window measured from the first attempt.
    pub window: Duration,
    /// Hard denial period entered after exceeding `max_attempts`.
    pub lockout_time: Duration,
}

/// Longest accepted `window` or `lockout_time` (30 days).
pub const MAX_RATE_LIMIT_DURATION: Duration = Duration::from_secs(30 * 24 * 60 * 60);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidRateLimiterConfig {
    #[error("max_attempts must be positive")]
    ZeroAttempts,

    #[error("window must be positive")]
    ZeroWindow,

    #[error("window must not exceed {}s", MAX_RATE_LIMIT_DURATION.as_secs())]
    WindowTooLong,

    #[error("lockout_time must not exceed {}s", MAX_RATE_LIMIT_DURATION.as_secs())]
    LockoutTooLong,
}

impl RateLimiterConfig {
    /// Preset for login attempts.
    pub fn login() -> Self {
        Self::default()
    }

    /// Preset for account registration: 3 attempts per hour, 2 hour lockout.
    pub fn registration() -> Self {
        Self {
            max_attempts: 3,
            window: Duration::from_secs(60 * 60),
            lockout_time: Duration::from_secs(2 * 60 * 60),
        }
    }

    /// Age after which an untouched record can no longer affect a decision.
    pub fn stale_after(&self) -> Duration {
        self.window.saturating_add(self.lockout_time)
    }

    pub fn validate(&self) -> Result<(), InvalidRateLimiterConfig> {
        if self.max_attempts == 0 {
            return Err(InvalidRateLimiterConfig::ZeroAttempts);
        }
        if self.window.is_zero() {
            return Err(InvalidRateLimiterConfig::ZeroWindow);
        }
        if self.window > MAX_RATE_LIMIT_DURATION {
            return Err(InvalidRateLimiterConfig::WindowTooLong);
        }
        if self.lockout_time > MAX_RATE_LIMIT_DURATION {
            return Err(InvalidRateLimiterConfig::LockoutTooLong);
        }
        Ok(())
    }
}

/// 5 attempts per 15 minutes, 30 minute lockout.
impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            window: Duration::from_secs(15 * 60),
            lockout_time: Duration::from_secs(30 * 60),
        }
    }
}
