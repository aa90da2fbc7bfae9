//! SessionValidator - policy layer over the session repository.
//!
//! Validates, extends, creates (with per-user capacity eviction) and
//! invalidates sessions. Holds no session state of its own: every call
//! goes to the repository.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domain::foundation::{SessionId, Timestamp, UserId};
use crate::domain::session::{Session, SessionConfig, SessionError};
use crate::ports::SessionRepository;

/// Result of a successful validation.
#[derive(Debug, Clone)]
pub struct ValidationOutcome {
    pub session: Session,
    pub user_id: UserId,
    /// Whether the expiry was pushed forward during this call.
    pub extended: bool,
    /// Non-fatal findings (fingerprint drift, failed extension).
    pub warnings: Vec<String>,
}

pub struct SessionValidator {
    repository: Arc<dyn SessionRepository>,
    config: SessionConfig,
}

impl SessionValidator {
    pub fn new(repository: Arc<dyn SessionRepository>, config: SessionConfig) -> Self {
        Self { repository, config }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Validates a client-supplied session token.
    ///
    /// # Errors
    ///
    /// - `NotFound` for empty, malformed, unknown, expired or inactive tokens
    /// - `Inactive` / `Expired` if the repository returned a session that
    ///   fails the local re-check
    /// - `SecurityContextMismatch` if enforcement is on and the fingerprint
    ///   differs
    /// - `Repository` on lookup failure
    pub async fn validate_session(
        &self,
        session_id: &str,
        ip_address: &str,
        user_agent: &str,
    ) -> Result<ValidationOutcome, SessionError> {
        let id = parse_token(session_id)?;

        let mut session = self
            .repository
            .validate_and_get(&id)
            .await?
            .ok_or(SessionError::NotFound)?;

        let now = Timestamp::now();
        if !session.is_active() {
            return Err(SessionError::Inactive);
        }
        if session.is_expired_at(now) {
            return Err(SessionError::Expired);
        }

        let mut warnings = Vec::new();
        if !session.validate_security_context(ip_address, user_agent) {
            if self.config.enforce_security_context {
                warn!(
                    session = %id.short(),
                    user_id = %session.user_id(),
                    "Session rejected: security context mismatch"
                );
                return Err(SessionError::SecurityContextMismatch {
                    ip_mismatch: session.ip_address() != ip_address,
                    user_agent_mismatch: session.user_agent() != user_agent,
                });
            }
            warnings = session.security_context_mismatches(ip_address, user_agent);
            debug!(
                session = %id.short(),
                warnings = warnings.len(),
                "Security context drift tolerated"
            );
        }

        let mut extended = false;
        if self.should_extend(&session, now) {
            match self
                .repository
                .extend_session(&id, self.config.extension_duration)
                .await
            {
                Ok(updated) => {
                    session = updated;
                    extended = true;
                    debug!(session = %id.short(), "Session extended");
                }
                Err(e) => {
                    warn!(session = %id.short(), error = %e, "Failed to extend session");
                    warnings.push(format!("Failed to extend session: {}", e));
                }
            }
        }

        Ok(ValidationOutcome {
            user_id: session.user_id().clone(),
            session,
            extended,
            warnings,
        })
    }

    /// Creates a session, first evicting the user's oldest sessions if the
    /// cap would otherwise be exceeded.
    ///
    /// Two concurrent calls for the same user may briefly leave one session
    /// over the cap.
    pub async fn create_session(
        &self,
        user_id: &UserId,
        ip_address: &str,
        user_agent: &str,
    ) -> Result<Session, SessionError> {
        if let Some(cap) = self.config.session_cap() {
            let active = self.repository.count_active_sessions(user_id).await?;
            if active >= cap {
                let excess = active - cap + 1;
                let oldest = self
                    .repository
                    .get_oldest_sessions_by_user(user_id, excess)
                    .await?;
                for session in &oldest {
                    self.repository.delete(session.id()).await?;
                }
                info!(
                    user_id = %user_id,
                    evicted = oldest.len(),
                    cap,
                    "Evicted oldest sessions to stay within cap"
                );
            }
        }

        let session = Session::new(user_id.clone(), ip_address, user_agent, &self.config)?;
        self.repository.create(&session).await?;

        info!(user_id = %user_id, session = %session.id().short(), "Session created");
        Ok(session)
    }

    /// Marks one session inactive.
    pub async fn invalidate_session(&self, session_id: &SessionId) -> Result<(), SessionError> {
        self.repository.invalidate_session(session_id).await?;
        debug!(session = %session_id.short(), "Session invalidated");
        Ok(())
    }

    /// Removes every session of a user.
    pub async fn invalidate_all_user_sessions(&self, user_id: &UserId) -> Result<(), SessionError> {
        self.repository.delete_by_user_id(user_id).await?;
        info!(user_id = %user_id, "All user sessions invalidated");
        Ok(())
    }

    /// Active sessions of a user, newest first.
    pub async fn get_user_sessions(&self, user_id: &UserId) -> Result<Vec<Session>, SessionError> {
        Ok(self.repository.get_by_user_id(user_id).await?)
    }

    /// Looks a session up in any state. Malformed tokens are `None`.
    pub async fn find_session(&self, session_id: &str) -> Result<Option<Session>, SessionError> {
        match SessionId::parse(session_id) {
            Ok(id) => Ok(self.repository.get_by_id(&id).await?),
            Err(_) => Ok(None),
        }
    }

    /// Invalidates a session that is still marked active but has passed
    /// its expiry, returning it. Any other session yields `None`.
    pub async fn retire_if_lapsed(&self, session_id: &str) -> Result<Option<Session>, SessionError> {
        let Some(session) = self.find_session(session_id).await? else {
            return Ok(None);
        };
        if !session.is_active() || !session.is_expired() {
            return Ok(None);
        }

        match self.repository.invalidate_session(session.id()).await {
            Ok(()) => Ok(Some(session)),
            // Removed concurrently, e.g. by the cleanup sweep.
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn should_extend(&self, session: &Session, now: Timestamp) -> bool {
        self.config.extension_enabled
            && session.expires_at().duration_since(&now) <= SessionConfig::extension_threshold()
    }
}

// Malformed tokens are indistinguishable from unknown ones to callers.
fn parse_token(session_id: &str) -> Result<SessionId, SessionError> {
    if session_id.is_empty() {
        return Err(SessionError::NotFound);
    }
    SessionId::parse(session_id).map_err(|_| SessionError::NotFound)
}
