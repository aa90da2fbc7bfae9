//! Session repository port.
//!
//! Defines the contract for persisting and retrieving sessions.
//!
//! # Design
//!
//! - **Collapsed not-found**: `validate_and_get` and `extend_session` only
//!   see sessions that are active and unexpired; absent, expired and
//!   invalidated sessions all look the same to callers
//! - **Owned results**: returned sessions are copies; mutating one changes
//!   nothing until `update` is called

use async_trait::async_trait;
use chrono::Duration;

use crate::domain::foundation::{DomainError, SessionId, UserId};
use crate::domain::session::Session;

/// Repository port for session persistence.
///
/// Implementations own their concurrency guarantees: `validate_and_get`
/// and `extend_session` must each be a single atomic read or
/// read-modify-write.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Persist a new session.
    ///
    /// # Errors
    ///
    /// - `Conflict` if the ID is already taken
    /// - `DatabaseError` on persistence failure
    async fn create(&self, session: &Session) -> Result<(), DomainError>;

    /// Find a session by ID regardless of its state.
    async fn get_by_id(&self, id: &SessionId) -> Result<Option<Session>, DomainError>;

    /// Active, unexpired sessions of a user, newest first.
    async fn get_by_user_id(&self, user_id: &UserId) -> Result<Vec<Session>, DomainError>;

    /// Overwrite a stored session.
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` if the session doesn't exist
    async fn update(&self, session: &Session) -> Result<(), DomainError>;

    /// Remove a session. Deleting an absent session is not an error.
    async fn delete(&self, id: &SessionId) -> Result<(), DomainError>;

    /// Remove every session of a user.
    async fn delete_by_user_id(&self, user_id: &UserId) -> Result<(), DomainError>;

    /// Remove every session that is expired or inactive.
    ///
    /// Returns the number of sessions removed.
    async fn cleanup_expired(&self) -> Result<u64, DomainError>;

    /// Atomically fetch a session only if it is active and unexpired.
    async fn validate_and_get(&self, id: &SessionId) -> Result<Option<Session>, DomainError>;

    /// Set a valid session's expiry to now + `duration`.
    ///
    /// Returns the session as stored after the change.
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` if the session is absent or not currently valid
    async fn extend_session(
        &self,
        id: &SessionId,
        duration: Duration,
    ) -> Result<Session, DomainError>;

    /// Mark a session inactive.
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` if the session doesn't exist
    async fn invalidate_session(&self, id: &SessionId) -> Result<(), DomainError>;

    /// Number of active, unexpired sessions of a user.
    async fn count_active_sessions(&self, user_id: &UserId) -> Result<u32, DomainError>;

    /// Up to `limit` active sessions of a user, oldest first.
    async fn get_oldest_sessions_by_user(
        &self,
        user_id: &UserId,
        limit: u32,
    ) -> Result<Vec<Session>, DomainError>;
}
