//! Session-specific error types.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Session lifecycle errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Session absent, or not currently valid.
    ///
    /// The repository does not distinguish deleted, expired and inactive
    /// sessions at its validate-and-fetch boundary.
    #[error("Session not found")]
    NotFound,

    #[error("Session is no longer active")]
    Inactive,

    #[error("Session has expired")]
    Expired,

    /// Client fingerprint differs while enforcement is enabled.
    #[error("Session security context mismatch (ip: {ip_mismatch}, user agent: {user_agent_mismatch})")]
    SecurityContextMismatch {
        ip_mismatch: bool,
        user_agent_mismatch: bool,
    },

    /// The OS entropy source could not produce a session identifier.
    #[error("Failed to generate session token: {0}")]
    TokenGeneration(String),

    /// Persistence failure, propagated unchanged.
    #[error(transparent)]
    Repository(DomainError),
}

impl SessionError {
    pub fn code(&self) -> ErrorCode {
        match self {
            SessionError::NotFound | SessionError::Inactive | SessionError::Expired => {
                ErrorCode::SessionNotFound
            }
            SessionError::SecurityContextMismatch { .. } => ErrorCode::Unauthorized,
            SessionError::TokenGeneration(_) => ErrorCode::InternalError,
            SessionError::Repository(err) => err.code,
        }
    }

    /// True for the outcomes a client resolves by logging in again.
    pub fn requires_login(&self) -> bool {
        matches!(
            self,
            SessionError::NotFound | SessionError::Inactive | SessionError::Expired
        )
    }
}

impl From<DomainError> for SessionError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::SessionNotFound => SessionError::NotFound,
            _ => SessionError::Repository(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_code_maps_to_not_found_variant() {
        let err: SessionError = DomainError::session_not_found("abc").into();
        assert_eq!(err, SessionError::NotFound);
        assert!(err.requires_login());
    }

    #[test]
    fn other_domain_errors_propagate_unchanged() {
        let original = DomainError::database("Failed to load session", "connection reset");
        let err: SessionError = original.clone().into();

        assert_eq!(err, SessionError::Repository(original.clone()));
        assert_eq!(err.code(), ErrorCode::DatabaseError);
        assert_eq!(err.to_string(), original.to_string());
    }

    #[test]
    fn mismatch_is_not_a_login_outcome() {
        let err = SessionError::SecurityContextMismatch {
            ip_mismatch: true,
            user_agent_mismatch: false,
        };
        assert!(!err.requires_login());
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }
}
