//! Session entity and its pure state transitions.
//!
//! A session grants a client continued authenticated access until it
//! expires or is invalidated. All rules here are in-memory; persisting a
//! change requires an explicit repository call.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{SessionId, Timestamp, UserId};

use super::errors::SessionError;
use super::policy::SessionConfig;

/// An authenticated client session.
///
/// # Invariants
///
/// - `id` is 256 bits of OS entropy, never reused
/// - `expires_at > created_at` at creation
/// - valid iff `is_active && now < expires_at`
/// - once invalidated, a session is never reactivated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
    user_id: UserId,
    created_at: Timestamp,
    expires_at: Timestamp,
    ip_address: String,
    user_agent: String,
    is_active: bool,
}

impl Session {
    /// Creates a new active session for `user_id`.
    ///
    /// # Errors
    ///
    /// - `TokenGeneration` if the OS entropy source is unavailable
    pub fn new(
        user_id: UserId,
        ip_address: impl Into<String>,
        user_agent: impl Into<String>,
        config: &SessionConfig,
    ) -> Result<Self, SessionError> {
        let id = SessionId::generate().map_err(|e| SessionError::TokenGeneration(e.to_string()))?;
        let now = Timestamp::now();

        Ok(Self {
            id,
            user_id,
            created_at: now,
            expires_at: now.plus(config.default_duration),
            ip_address: ip_address.into(),
            user_agent: user_agent.into(),
            is_active: true,
        })
    }

    /// Reconstitute a session from persistence (no validation).
    pub fn reconstitute(
        id: SessionId,
        user_id: UserId,
        created_at: Timestamp,
        expires_at: Timestamp,
        ip_address: String,
        user_agent: String,
        is_active: bool,
    ) -> Self {
        Self {
            id,
            user_id,
            created_at,
            expires_at,
            ip_address,
            user_agent,
            is_active,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the session ID.
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Returns the owner's user ID.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Returns when the session was created.
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Returns when the session expires.
    pub fn expires_at(&self) -> Timestamp {
        self.expires_at
    }

    /// Returns the IP address captured at creation.
    pub fn ip_address(&self) -> &str {
        &self.ip_address
    }

    /// Returns the user agent captured at creation.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Returns whether the session has not been invalidated.
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Rules
    // ─────────────────────────────────────────────────────────────────────────

    /// True once the current time has passed `expires_at`.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Timestamp::now())
    }

    /// `is_expired` evaluated against a given instant.
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        !now.is_before(&self.expires_at)
    }

    /// True iff active and not expired.
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Timestamp::now())
    }

    /// `is_valid` evaluated against a given instant.
    pub fn is_valid_at(&self, now: Timestamp) -> bool {
        self.is_active && !self.is_expired_at(now)
    }

    /// Time left before expiry (negative once expired).
    pub fn remaining_lifetime(&self) -> Duration {
        self.expires_at.duration_since(&Timestamp::now())
    }

    /// Sets `expires_at` to now + `duration`.
    ///
    /// Replaces the remaining lifetime; it does not add to it. No validity
    /// check is performed.
    pub fn extend(&mut self, duration: Duration) {
        self.expires_at = Timestamp::now().plus(duration);
    }

    /// Marks the session inactive. Idempotent.
    pub fn invalidate(&mut self) {
        self.is_active = false;
    }

    /// True iff both IP address and user agent match the captured values.
    pub fn validate_security_context(&self, ip_address: &str, user_agent: &str) -> bool {
        self.ip_address == ip_address && self.user_agent == user_agent
    }

    /// One warning per field that differs from the captured fingerprint.
    pub fn security_context_mismatches(&self, ip_address: &str, user_agent: &str) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.ip_address != ip_address {
            warnings.push(format!(
                "IP address changed from {} to {}",
                self.ip_address, ip_address
            ));
        }
        if self.user_agent != user_agent {
            warnings.push("User agent changed since session creation".to_string());
        }
        warnings
    }
}
