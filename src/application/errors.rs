//! Errors surfaced by authentication flows.

use std::time::Duration;
use thiserror::Error;

use crate::domain::foundation::{DomainError, ValidationError};
use crate::domain::session::SessionError;
use crate::ports::RateLimitDenied;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Too many attempts; expected under abuse, not a fault.
    #[error("{message}")]
    RateLimitExceeded { retry_after: Duration, message: String },

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Invalid email address: {0}")]
    InvalidEmail(ValidationError),

    #[error("Email address is already registered")]
    EmailAlreadyRegistered,

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Repository(DomainError),
}

/// What a client should do after a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    /// Wait before retrying.
    TryAgainLater { retry_after: Duration },
    /// The session is gone; show the login form.
    LogInAgain,
    /// The session fingerprint changed; force a fresh login.
    Reauthenticate,
    /// Fix the submitted input.
    CorrectInput,
    /// Transient server-side failure.
    Retry,
}

impl AuthError {
    pub fn user_action(&self) -> UserAction {
        match self {
            AuthError::RateLimitExceeded { retry_after, .. } => UserAction::TryAgainLater {
                retry_after: *retry_after,
            },
            AuthError::InvalidCredentials
            | AuthError::InvalidEmail(_)
            | AuthError::EmailAlreadyRegistered => UserAction::CorrectInput,
            AuthError::Session(err) => match err {
                SessionError::NotFound | SessionError::Inactive | SessionError::Expired => {
                    UserAction::LogInAgain
                }
                SessionError::SecurityContextMismatch { .. } => UserAction::Reauthenticate,
                SessionError::TokenGeneration(_) | SessionError::Repository(_) => {
                    UserAction::Retry
                }
            },
            AuthError::Repository(_) => UserAction::Retry,
        }
    }
}

impl From<RateLimitDenied> for AuthError {
    fn from(denied: RateLimitDenied) -> Self {
        AuthError::RateLimitExceeded {
            retry_after: denied.retry_after,
            message: denied.message,
        }
    }
}

impl From<DomainError> for AuthError {
    fn from(err: DomainError) -> Self {
        AuthError::Repository(err)
    }
}
