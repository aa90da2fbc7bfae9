//! Session domain events.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{domain_event, EventId, SessionId, Timestamp, UserId};

/// Published when a session is observed past its expiry and retired.
///
/// Emitted at most once per session: the session is invalidated in the
/// same step, so later lookups no longer see it as lapsed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionExpired {
    pub event_id: EventId,
    pub user_id: UserId,
    pub session_id: SessionId,
    pub expired_at: Timestamp,
}

domain_event!(
    SessionExpired,
    event_type = "session.expired",
    schema_version = 1,
    aggregate_id = user_id,
    aggregate_type = "User",
    occurred_at = expired_at,
    event_id = event_id
);

impl SessionExpired {
    pub fn new(user_id: UserId, session_id: SessionId, expired_at: Timestamp) -> Self {
        Self {
            event_id: EventId::new(),
            user_id,
            session_id,
            expired_at,
        }
    }
}
