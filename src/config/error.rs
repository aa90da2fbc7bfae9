//! Configuration error types

use thiserror::Error;

use crate::adapters::rate_limiter::InvalidRateLimiterConfig;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Pool max_connections must be at least 1")]
    EmptyPool,

    #[error("Pool size exceeds maximum allowed (100)")]
    PoolSizeTooLarge,

    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),

    #[error("Invalid {rule} rate limit: {source}")]
    InvalidRateLimit {
        rule: &'static str,
        #[source]
        source: InvalidRateLimiterConfig,
    },

    #[error("Invalid log filter directive: {0}")]
    InvalidLogLevel(String),
}
