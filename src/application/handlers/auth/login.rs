//! LoginHandler - Command handler for password login.

use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

use crate::application::{AuthError, SessionValidator};
use crate::domain::foundation::{EventId, RequestContext, Timestamp, UserId};
use crate::domain::session::Session;
use crate::domain::user::{Email, UserLoggedIn};
use crate::ports::{CredentialStore, EventPublisher, RateLimiter};

use super::{login_email_key, login_ip_key, publish_event};

/// Command to log in with email and password.
#[derive(Clone)]
pub struct LoginCommand {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for LoginCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCommand")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginResult {
    pub session: Session,
    pub user_id: UserId,
}

/// Handler for password login.
///
/// Attempts are throttled per client address and per account. A
/// successful login clears the account counter; the address counter is
/// left to expire on its own.
pub struct LoginHandler {
    credentials: Arc<dyn CredentialStore>,
    validator: Arc<SessionValidator>,
    rate_limiter: Arc<dyn RateLimiter>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl LoginHandler {
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
        cmd: LoginCommand,
        ctx: &RequestContext,
    ) -> Result<LoginResult, AuthError> {
        self.rate_limiter
            .allow(&login_ip_key(&ctx.ip_address))
            .await
            .into_result()?;

        let email = Email::parse(&cmd.email).map_err(AuthError::InvalidEmail)?;
        let email_key = login_email_key(email.as_str());

        self.rate_limiter.allow(&email_key).await.into_result()?;

        let user_id = match self
            .credentials
            .verify_credentials(&email, &cmd.password)
            .await?
        {
            Some(user_id) => user_id,
            None => {
                warn!(ip = %ctx.ip_address, "Login failed: invalid credentials");
                return Err(AuthError::InvalidCredentials);
            }
        };

        self.rate_limiter.reset(&email_key).await;

        let session = self
            .validator
            .create_session(&user_id, &ctx.ip_address, &ctx.user_agent)
            .await?;

        let event = UserLoggedIn {
            event_id: EventId::new(),
            user_id: user_id.clone(),
            session_id: session.id().clone(),
            ip_address: ctx.ip_address.clone(),
            user_agent: ctx.user_agent.clone(),
            logged_in_at: Timestamp::now(),
        };
        publish_event(self.event_publisher.as_ref(), &event, &user_id, ctx).await;

        info!(
            user_id = %user_id,
            session = %session.id().short(),
            ip = %ctx.ip_address,
            "User logged in"
        );

        Ok(LoginResult { session, user_id })
    }
}
