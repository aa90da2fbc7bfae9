//! Rate limiting port for protecting authentication endpoints.
//!
//! Keys are free-form strings chosen by the caller, conventionally
//! `"<action>:<subject>"` such as `"login:203.0.113.7"` or
//! `"login:alice@example.com"`. Each limiter instance governs one action
//! class with its own thresholds.

use async_trait::async_trait;
use std::fmt;
use std::time::Duration;

/// Port for attempt-counting rate limiters.
///
/// Implementations must evaluate and update the record for a key as one
/// atomic step: two concurrent `allow` calls on the same key never
/// observe the same count.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Records an attempt for `key` and decides whether it may proceed.
    async fn allow(&self, key: &str) -> RateLimitDecision;

    /// Forgets all history for `key`.
    async fn reset(&self, key: &str);

    /// Attempts counted in the current window (0 for unknown keys).
    async fn get_attempts(&self, key: &str) -> u32;
}

/// Outcome of a single `allow` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed,
    Denied(RateLimitDenied),
}

impl RateLimitDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitDecision::Allowed)
    }

    pub fn is_denied(&self) -> bool {
        !self.is_allowed()
    }

    /// Converts a denial into an error so callers can use `?`.
    pub fn into_result(self) -> Result<(), RateLimitDenied> {
        match self {
            RateLimitDecision::Allowed => Ok(()),
            RateLimitDecision::Denied(denied) => Err(denied),
        }
    }
}

/// Details of a rate limit denial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitDenied {
    /// How long until the key may try again.
    pub retry_after: Duration,
    /// Human-readable message explaining the denial.
    pub message: String,
}

impl RateLimitDenied {
    pub fn new(retry_after: Duration) -> Self {
        Self {
            retry_after,
            message: format!(
                "Too many attempts. Try again in {}",
                format_retry_after(retry_after)
            ),
        }
    }
}

impl fmt::Display for RateLimitDenied {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Renders a wait as `"1h 5m"`, `"29m 59s"` or `"42s"`.
///
/// Sub-second remainders round up so a client never retries early.
pub fn format_retry_after(duration: Duration) -> String {
    let mut secs = duration.as_secs();
    if duration.subsec_nanos() > 0 {
        secs += 1;
    }

    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;

    match (hours, minutes) {
        (0, 0) => format!("{}s", seconds),
        (0, m) if seconds == 0 => format!("{}m", m),
        (0, m) => format!("{}m {}s", m, seconds),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h {}m", h, m),
    }
}
