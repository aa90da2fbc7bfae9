//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps, request context, event infrastructure
//! and error types that form the vocabulary of the Gatekeeper domain.

mod context;
mod errors;
mod events;
mod ids;
mod timestamp;

pub use context::RequestContext;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use events::{
    domain_event, DomainEvent, EventEnvelope, EventId, EventMetadata, SerializableDomainEvent,
};
pub use ids::{SessionId, UserId, SESSION_ID_BYTES};
pub use timestamp::Timestamp;
