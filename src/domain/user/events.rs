//! User authentication events.
//!
//! All events are keyed by the user ID so a consumer sees one ordered
//! stream per principal.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{domain_event, EventId, SessionId, Timestamp, UserId};

use super::Email;

// ════════════════════════════════════════════════════════════════════════════
// UserLoggedIn
// ════════════════════════════════════════════════════════════════════════════

/// Published after credentials were accepted and a session was created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserLoggedIn {
    pub event_id: EventId,
    pub user_id: UserId,
    pub session_id: SessionId,
    pub ip_address: String,
    pub user_agent: String,
    pub logged_in_at: Timestamp,
}

domain_event!(
    UserLoggedIn,
    event_type = "user.logged_in",
    schema_version = 1,
    aggregate_id = user_id,
    aggregate_type = "User",
    occurred_at = logged_in_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// UserRegistered
// ════════════════════════════════════════════════════════════════════════════

/// Published when a new account is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRegistered {
    pub event_id: EventId,
    pub user_id: UserId,
    pub email: Email,
    pub ip_address: String,
    pub registered_at: Timestamp,
}

domain_event!(
    UserRegistered,
    event_type = "user.registered",
    schema_version = 1,
    aggregate_id = user_id,
    aggregate_type = "User",
    occurred_at = registered_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// UserLoggedOut
// ════════════════════════════════════════════════════════════════════════════

/// Published when a user ends a session explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserLoggedOut {
    pub event_id: EventId,
    pub user_id: UserId,
    pub session_id: SessionId,
    pub logged_out_at: Timestamp,
}

domain_event!(
    UserLoggedOut,
    event_type = "user.logged_out",
    schema_version = 1,
    aggregate_id = user_id,
    aggregate_type = "User",
    occurred_at = logged_out_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// PasswordChanged
// ════════════════════════════════════════════════════════════════════════════

/// Published after a password change. Every session of the user has been
/// revoked by the time this is emitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordChanged {
    pub event_id: EventId,
    pub user_id: UserId,
    pub ip_address: String,
    pub changed_at: Timestamp,
}

domain_event!(
    PasswordChanged,
    event_type = "password.changed",
    schema_version = 1,
    aggregate_id = user_id,
    aggregate_type = "User",
    occurred_at = changed_at,
    event_id = event_id
);
