//! RegisterHandler - Command handler for account registration.

use std::fmt;
use std::sync::Arc;
use tracing::info;

use crate::application::{AuthError, SessionValidator};
use crate::domain::foundation::{ErrorCode, EventId, RequestContext, Timestamp, UserId};
use crate::domain::session::Session;
use crate::domain::user::{Email, UserRegistered};
use crate::ports::{CredentialStore, EventPublisher, RateLimiter};

use super::{publish_event, register_ip_key};

/// Command to register a new account.
#[derive(Clone)]
pub struct RegisterCommand {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for RegisterCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterCommand")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Result of a successful registration. The new account starts logged in.
#[derive(Debug, Clone)]
pub struct RegisterResult {
    pub user_id: UserId,
    pub session: Session,
}

/// Handler for account registration, throttled per client address.
pub struct RegisterHandler {
    credentials: Arc<dyn CredentialStore>,
    validator: Arc<SessionValidator>,
    rate_limiter: Arc<dyn RateLimiter>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl RegisterHandler {
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        validator: Arc<SessionValidator>,
        rate_limiter: Arc<dyn RateLimiter>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            credentials,
            validator,
            rate_limiter,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: RegisterCommand,
        ctx: &RequestContext,
    ) -> Result<RegisterResult, AuthError> {
        self.rate_limiter
            .allow(&register_ip_key(&ctx.ip_address))
            .await
            .into_result()?;

        let email = Email::parse(&cmd.email).map_err(AuthError::InvalidEmail)?;

        let user_id = self
            .credentials
            .register_user(&email, &cmd.password)
            .await
            .map_err(|e| match e.code {
                ErrorCode::Conflict => AuthError::EmailAlreadyRegistered,
                _ => AuthError::from(e),
            })?;

        let session = self
            .validator
            .create_session(&user_id, &ctx.ip_address, &ctx.user_agent)
            .await?;

        let event = UserRegistered {
            event_id: EventId::new(),
            user_id: user_id.clone(),
            email,
            ip_address: ctx.ip_address.clone(),
            registered_at: Timestamp::now(),
        };
        publish_event(self.event_publisher.as_ref(), &event, &user_id, ctx).await;

        info!(user_id = %user_id, ip = %ctx.ip_address, "User registered");

        Ok(RegisterResult { user_id, session })
    }
}
