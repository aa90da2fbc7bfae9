//! Rate limiting configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::adapters::rate_limiter::{RateLimiterConfig, DEFAULT_SWEEP_INTERVAL};

/// Thresholds for one action class, in whole seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RateLimitRule {
    pub max_attempts: u32,
    pub window_secs: u64,
    pub lockout_secs: u64,
}

impl RateLimitRule {
    /// Convert to the limiter's own configuration type
    pub fn to_limiter_config(&self) -> RateLimiterConfig {
        RateLimiterConfig {
            max_attempts: self.max_attempts,
            window: Duration::from_secs(self.window_secs),
            lockout_time: Duration::from_secs(self.lockout_secs),
        }
    }

    fn login() -> Self {
        Self::from(RateLimiterConfig::login())
    }

    fn registration() -> Self {
        Self::from(RateLimiterConfig::registration())
    }
}

impl From<RateLimiterConfig> for RateLimitRule {
    fn from(config: RateLimiterConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            window_secs: config.window.as_secs(),
            lockout_secs: config.lockout_time.as_secs(),
        }
    }
}

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitSettings {
    /// Login attempts, keyed per client address and per account
    #[serde(default = "RateLimitRule::login")]
    pub login: RateLimitRule,

    /// Registrations, keyed per client address
    #[serde(default = "RateLimitRule::registration")]
    pub registration: RateLimitRule,

    /// Password change attempts, keyed per account
    #[serde(default = "RateLimitRule::login")]
    pub password_change: RateLimitRule,

    /// Interval between stale-record sweeps in seconds
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

impl RateLimitSettings {
    /// Get sweep interval as Duration
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    /// Validate every rule
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (rule, settings) in [
            ("login", &self.login),
            ("registration", &self.registration),
            ("password_change", &self.password_change),
        ] {
            settings
                .to_limiter_config()
                .validate()
                .map_err(|source| ValidationError::InvalidRateLimit { rule, source })?;
        }
        if self.sweep_interval_secs == 0 {
            return Err(ValidationError::ZeroDuration("rate_limit.sweep_interval_secs"));
        }
        Ok(())
    }
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            login: RateLimitRule::login(),
            registration: RateLimitRule::registration(),
            password_change: RateLimitRule::login(),
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

fn default_sweep_interval() -> u64 {
    DEFAULT_SWEEP_INTERVAL.as_secs()
}
