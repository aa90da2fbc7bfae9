//! Session domain module.
//!
//! Authenticated client sessions: creation, expiry, extension,
//! invalidation and the client fingerprint check.
//!
//! # Events
//!
//! - `SessionExpired` - Published when a lapsed session is retired

mod aggregate;
mod errors;
mod events;
mod policy;

pub use aggregate::Session;
pub use errors::SessionError;
pub use events::SessionExpired;
pub use policy::{SessionConfig, EXTENSION_THRESHOLD_MINUTES};
