//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, events)
//! - `session` - Session entity, lifecycle rules and policy
//! - `user` - Email value object and authentication events

pub mod foundation;
pub mod session;
pub mod user;
