//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `events` - In-process event bus
//! - `postgres` - PostgreSQL session persistence
//! - `rate_limiter` - In-memory attempt counting
//! - `sessions` - In-memory session persistence

pub mod events;
pub mod postgres;
pub mod rate_limiter;
pub mod sessions;

pub use events::InMemoryEventBus;
pub use postgres::PostgresSessionRepository;
pub use rate_limiter::{InMemoryRateLimiter, RateLimiterConfig};
pub use sessions::InMemorySessionRepository;
