//! ChangePasswordHandler - Command handler for password changes.

use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

use crate::application::{AuthError, SessionValidator};
use crate::domain::foundation::{EventId, RequestContext, Timestamp, UserId};
use crate::domain::session::Session;
use crate::domain::user::PasswordChanged;
use crate::ports::{CredentialStore, EventPublisher, RateLimiter};

use super::{password_change_key, publish_event};

/// Command to change the password of the account behind `session_id`.
#[derive(Clone)]
pub struct ChangePasswordCommand {
    pub session_id: String,
    pub current_password: String,
    pub new_password: String,
}

impl fmt::Debug for ChangePasswordCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangePasswordCommand")
            .field("session", &self.session_id.get(..8).unwrap_or(""))
            .field("current_password", &"[REDACTED]")
            .field("new_password", &"[REDACTED]")
            .finish()
    }
}

/// Result of a password change.
#[derive(Debug, Clone)]
pub struct ChangePasswordResult {
    pub user_id: UserId,
    /// Replacement for every session the user held before the change.
    pub session: Session,
}

/// Handler for password changes.
///
/// A successful change signs the user out everywhere and issues a single
/// fresh session for the requesting client.
pub struct ChangePasswordHandler {
    credentials: Arc<dyn CredentialStore>,
    validator: Arc<SessionValidator>,
    rate_limiter: Arc<dyn RateLimiter>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl ChangePasswordHandler {
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
        cmd: ChangePasswordCommand,
        ctx: &RequestContext,
    ) -> Result<ChangePasswordResult, AuthError> {
        let outcome = self
            .validator
            .validate_session(&cmd.session_id, &ctx.ip_address, &ctx.user_agent)
            .await?;
        let user_id = outcome.user_id;

        let key = password_change_key(&user_id);
        self.rate_limiter.allow(&key).await.into_result()?;

        let changed = self
            .credentials
            .change_password(&user_id, &cmd.current_password, &cmd.new_password)
            .await?;
        if !changed {
            warn!(user_id = %user_id, "Password change rejected: current password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        self.rate_limiter.reset(&key).await;
        self.validator.invalidate_all_user_sessions(&user_id).await?;
        let session = self
            .validator
            .create_session(&user_id, &ctx.ip_address, &ctx.user_agent)
            .await?;

        let event = PasswordChanged {
            event_id: EventId::new(),
            user_id: user_id.clone(),
            ip_address: ctx.ip_address.clone(),
            changed_at: Timestamp::now(),
        };
        publish_event(self.event_publisher.as_ref(), &event, &user_id, ctx).await;

        info!(user_id = %user_id, "Password changed, other sessions revoked");

        Ok(ChangePasswordResult { user_id, session })
    }
}
