//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresSessionRepository` - Session persistence (`sessions` table)

mod session_repository;

pub use session_repository::PostgresSessionRepository;
