//! Shared dependencies for the auth command handlers.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::adapters::rate_limiter::{InMemoryRateLimiter, InvalidRateLimiterConfig};
use crate::config::{RateLimitSettings, SessionSettings};
use crate::ports::{CredentialStore, EventPublisher, SessionRepository};

use super::handlers::{
    AuthenticateHandler, ChangePasswordHandler, LoginHandler, LogoutHandler, RegisterHandler,
};
use super::SessionValidator;

/// Arc-wrapped dependencies from which handlers are built on demand.
///
/// Cheap to clone. Each action class gets its own limiter so that, for
/// example, a registration burst cannot lock out logins.
#[derive(Clone)]
pub struct AuthAppState {
    pub credentials: Arc<dyn CredentialStore>,
    pub validator: Arc<SessionValidator>,
    pub login_limiter: Arc<InMemoryRateLimiter>,
    pub registration_limiter: Arc<InMemoryRateLimiter>,
    pub password_limiter: Arc<InMemoryRateLimiter>,
    pub event_publisher: Arc<dyn EventPublisher>,
}

impl AuthAppState {
    /// Wires the handlers' dependencies from configuration.
    pub fn from_settings(
        session: &SessionSettings,
        rate_limit: &RateLimitSettings,
        repository: Arc<dyn SessionRepository>,
        credentials: Arc<dyn CredentialStore>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Result<Self, InvalidRateLimiterConfig> {
        Ok(Self {
            credentials,
            validator: Arc::new(SessionValidator::new(repository, session.to_session_config())),
            login_limiter: Arc::new(InMemoryRateLimiter::new(rate_limit.login.to_limiter_config())?),
            registration_limiter: Arc::new(InMemoryRateLimiter::new(
                rate_limit.registration.to_limiter_config(),
            )?),
            password_limiter: Arc::new(InMemoryRateLimiter::new(
                rate_limit.password_change.to_limiter_config(),
            )?),
            event_publisher,
        })
    }

    /// Starts one stale-record sweeper per limiter; all stop on `shutdown`.
    pub fn spawn_sweepers(&self, interval: Duration, shutdown: CancellationToken) -> Vec<JoinHandle<()>> {
        [&self.login_limiter, &self.registration_limiter, &self.password_limiter]
            .into_iter()
            .map(|limiter| limiter.spawn_sweeper(interval, shutdown.clone()))
            .collect()
    }

    pub fn login_handler(&self) -> LoginHandler {
        LoginHandler::new(
            self.credentials.clone(),
            self.validator.clone(),
            self.login_limiter.clone(),
            self.event_publisher.clone(),
        )
    }

    pub fn register_handler(&self) -> RegisterHandler {
        RegisterHandler::new(
            self.credentials.clone(),
            self.validator.clone(),
            self.registration_limiter.clone(),
            self.event_publisher.clone(),
        )
    }

    pub fn logout_handler(&self) -> LogoutHandler {
        LogoutHandler::new(self.validator.clone(), self.event_publisher.clone())
    }

    pub fn change_password_handler(&self) -> ChangePasswordHandler {
        ChangePasswordHandler::new(
            self.credentials.clone(),
            self.validator.clone(),
            self.password_limiter.clone(),
            self.event_publisher.clone(),
        )
    }

    pub fn authenticate_handler(&self) -> AuthenticateHandler {
        AuthenticateHandler::new(self.validator.clone(), self.event_publisher.clone())
    }
}
