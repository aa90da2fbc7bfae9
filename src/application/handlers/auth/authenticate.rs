//! AuthenticateHandler - resolves the session behind an inbound request.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::application::{AuthError, SessionValidator, ValidationOutcome};
use crate::domain::foundation::{RequestContext, Timestamp};
use crate::domain::session::{SessionError, SessionExpired};
use crate::ports::EventPublisher;

use super::publish_event;

/// Command carrying the session token presented by a client.
#[derive(Clone)]
pub struct AuthenticateCommand {
    pub session_id: String,
}

impl std::fmt::Debug for AuthenticateCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticateCommand")
            .field("session", &self.session_id.get(..8).unwrap_or(""))
            .finish()
    }
}

/// Handler that authenticates a request by its session token.
///
/// When the token belongs to a session that lapsed while still marked
/// active, the session is retired and `session.expired` is published.
/// Retiring flips the session inactive, so the event fires at most once
/// per session.
pub struct AuthenticateHandler {
    validator: Arc<SessionValidator>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl AuthenticateHandler {
    pub fn new(validator: Arc<SessionValidator>, event_publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            validator,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: AuthenticateCommand,
        ctx: &RequestContext,
    ) -> Result<ValidationOutcome, AuthError> {
        match self
            .validator
            .validate_session(&cmd.session_id, &ctx.ip_address, &ctx.user_agent)
            .await
        {
            Ok(outcome) => {
                for warning in &outcome.warnings {
                    debug!(user_id = %outcome.user_id, warning = %warning, "Session validation warning");
                }
                Ok(outcome)
            }
            Err(err @ (SessionError::NotFound | SessionError::Expired)) => {
                self.retire_lapsed(&cmd.session_id, ctx).await;
                Err(err.into())
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn retire_lapsed(&self, session_id: &str, ctx: &RequestContext) {
        let session = match self.validator.retire_if_lapsed(session_id).await {
            Ok(Some(session)) => session,
            Ok(None) => return,
            Err(e) => {
                warn!(error = %e, "Failed to retire lapsed session");
                return;
            }
        };

        let event = SessionExpired::new(
            session.user_id().clone(),
            session.id().clone(),
            Timestamp::now(),
        );
        publish_event(self.event_publisher.as_ref(), &event, session.user_id(), ctx).await;

        info!(
            user_id = %session.user_id(),
            session = %session.id().short(),
            "Session expired"
        );
    }
}
