//! Gatekeeper - session lifecycle and login rate limiting
//!
//! Issues, validates, extends and revokes authenticated sessions, throttles
//! login-style endpoints with a sliding window and lockout, and sweeps
//! stale sessions in the background. Transport is left to the embedding
//! application.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
