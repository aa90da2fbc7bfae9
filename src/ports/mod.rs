//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `SessionRepository` - Durable session storage
//! - `RateLimiter` - Attempt counting with lockout
//! - `CredentialStore` - Password verification and account creation
//! - `EventPublisher` - Domain event delivery

mod credential_store;
mod event_publisher;
mod rate_limiter;
mod session_repository;

pub use credential_store::CredentialStore;
pub use event_publisher::EventPublisher;
pub use rate_limiter::{format_retry_after, RateLimitDecision, RateLimitDenied, RateLimiter};
pub use session_repository::SessionRepository;
