//! LogoutHandler - Command handler for ending a session.

use std::sync::Arc;
use tracing::{debug, info};

use crate::application::{AuthError, SessionValidator};
use crate::domain::foundation::{EventId, RequestContext, Timestamp};
use crate::domain::user::UserLoggedOut;
use crate::ports::EventPublisher;

use super::publish_event;

/// Command to end the session identified by `session_id`.
#[derive(Clone)]
pub struct LogoutCommand {
    pub session_id: String,
}

impl std::fmt::Debug for LogoutCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogoutCommand")
            .field("session", &self.session_id.get(..8).unwrap_or(""))
            .finish()
    }
}

/// Outcome of a logout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutResult {
    /// An active session was ended.
    LoggedOut,
    /// Nothing to do: unknown, malformed or already inactive token.
    AlreadyLoggedOut,
}

/// Handler for logout. Idempotent: repeating it is never an error.
pub struct LogoutHandler {
    validator: Arc<SessionValidator>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl LogoutHandler {
    pub fn new(validator: Arc<SessionValidator>, event_publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            validator,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: LogoutCommand,
        ctx: &RequestContext,
    ) -> Result<LogoutResult, AuthError> {
        let session = match self.validator.find_session(&cmd.session_id).await? {
            Some(session) if session.is_active() => session,
            _ => {
                debug!("Logout for unknown or inactive session");
                return Ok(LogoutResult::AlreadyLoggedOut);
            }
        };

        self.validator.invalidate_session(session.id()).await?;

        let event = UserLoggedOut {
            event_id: EventId::new(),
            user_id: session.user_id().clone(),
            session_id: session.id().clone(),
            logged_out_at: Timestamp::now(),
        };
        publish_event(self.event_publisher.as_ref(), &event, session.user_id(), ctx).await;

        info!(
            user_id = %session.user_id(),
            session = %session.id().short(),
            "User logged out"
        );

        Ok(LogoutResult::LoggedOut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::auth::test_support::Harness;
    use crate::domain::foundation::UserId;
    use crate::ports::SessionRepository;

    fn handler(harness: &Harness) -> LogoutHandler {
        LogoutHandler::new(harness.validator.clone(), harness.bus.clone())
    }

    fn command(session_id: &str) -> LogoutCommand {
        LogoutCommand {
            session_id: session_id.to_string(),
        }
    }

    #[tokio::test]
    async fn logout_invalidates_session_and_publishes_event() {
        let harness = Harness::new();
        let user_id = UserId::new("user-1").unwrap();
        let session = harness
            .validator
            .create_session(&user_id, "203.0.113.7", "Firefox")
            .await
            .unwrap();

        let result = handler(&harness)
            .handle(command(session.id().as_str()), &RequestContext::test_fixture())
            .await
            .unwrap();

        assert_eq!(result, LogoutResult::LoggedOut);
        let stored = harness.repository.get_by_id(session.id()).await.unwrap().unwrap();
        assert!(!stored.is_active());

        let events = harness.bus.events_of_type("user.logged_out");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].payload["session_id"], session.id().as_str());
    }

    #[tokio::test]
    async fn second_logout_is_a_quiet_no_op() {
        let harness = Harness::new();
        let user_id = UserId::new("user-1").unwrap();
        let session = harness
            .validator
            .create_session(&user_id, "203.0.113.7", "Firefox")
            .await
            .unwrap();
        let handler = handler(&harness);
        let ctx = RequestContext::test_fixture();

        handler.handle(command(session.id().as_str()), &ctx).await.unwrap();
        let again = handler.handle(command(session.id().as_str()), &ctx).await.unwrap();

        assert_eq!(again, LogoutResult::AlreadyLoggedOut);
        assert_eq!(harness.bus.events_of_type("user.logged_out").len(), 1);
    }

    #[tokio::test]
    async fn unknown_and_malformed_tokens_are_no_ops() {
        let harness = Harness::new();
        let handler = handler(&harness);
        let ctx = RequestContext::test_fixture();

        let unknown = "a".repeat(64);
        for token in ["", "garbage", unknown.as_str()] {
            let result = handler.handle(command(token), &ctx).await.unwrap();
            assert_eq!(result, LogoutResult::AlreadyLoggedOut);
        }
        assert_eq!(harness.bus.event_count(), 0);
    }

    #[test]
    fn debug_output_truncates_token() {
        let token = "0123456789abcdef".repeat(4);
        let rendered = format!("{:?}", command(&token));

        assert!(rendered.contains("01234567"));
        assert!(!rendered.contains(&token));
    }
}
