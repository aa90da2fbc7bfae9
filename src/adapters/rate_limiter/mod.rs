//! Rate limiter adapters.
//!
//! ## Usage
//!
//! ```ignore
//! use gatekeeper::adapters::rate_limiter::{InMemoryRateLimiter, RateLimiterConfig};
//!
//! let login = InMemoryRateLimiter::login();
//! let custom = InMemoryRateLimiter::new(RateLimiterConfig {
//!     max_attempts: 10,
//!     ..Default::default()
//! })?;
//! let sweeper = login.spawn_sweeper(DEFAULT_SWEEP_INTERVAL, shutdown.clone());
//! ```

mod config;
mod in_memory;

pub use config::{InvalidRateLimiterConfig, RateLimiterConfig, MAX_RATE_LIMIT_DURATION};
pub use in_memory::{InMemoryRateLimiter, DEFAULT_SWEEP_INTERVAL, MIN_SWEEP_INTERVAL};
