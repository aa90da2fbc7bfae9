//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `GATEKEEPER` prefix and
//! nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use gatekeeper::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Sessions last {}s", config.session.duration_secs);
//! ```

mod database;
mod error;
mod logging;
mod rate_limit;
mod session;

pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::LoggingConfig;
pub use rate_limit::{RateLimitRule, RateLimitSettings};
pub use session::SessionSettings;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
/// Only `database.url` is required; every other value has a default.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Session store connection
    pub database: DatabaseConfig,

    /// Session lifetime, capacity and cleanup
    #[serde(default)]
    pub session: SessionSettings,

    /// Login, registration and password change throttling
    #[serde(default)]
    pub rate_limit: RateLimitSettings,

    /// Log filter and output format
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `GATEKEEPER` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `GATEKEEPER__DATABASE__URL=...` -> `database.url = ...`
    /// - `GATEKEEPER__RATE_LIMIT__LOGIN__MAX_ATTEMPTS=10` -> `rate_limit.login.max_attempts = 10`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Required environment variables are missing
    /// - Values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("GATEKEEPER")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns the first `ValidationError` found, section by section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.database.validate()?;
        self.session.validate()?;
        self.rate_limit.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}
