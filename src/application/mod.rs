//! Application layer - services and command handlers.
//!
//! Orchestrates domain rules over the ports. Holds no state beyond the
//! `Arc`s it is constructed with.

mod auth_state;
mod errors;
pub mod handlers;
mod session_cleanup;
mod session_validator;

pub use auth_state::AuthAppState;
pub use errors::{AuthError, UserAction};
pub use handlers::{
    AuthenticateCommand, AuthenticateHandler, ChangePasswordCommand, ChangePasswordHandler,
    ChangePasswordResult, LoginCommand, LoginHandler, LoginResult, LogoutCommand, LogoutHandler,
    LogoutResult, RegisterCommand, RegisterHandler, RegisterResult,
};
pub use session_cleanup::{
    SessionCleanupService, DEFAULT_CLEANUP_INTERVAL, MAX_CLEANUP_INTERVAL, MIN_CLEANUP_INTERVAL,
};
pub use session_validator::{SessionValidator, ValidationOutcome};
