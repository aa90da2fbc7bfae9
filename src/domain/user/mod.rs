//! User authentication module.
//!
//! Accounts themselves live behind the `CredentialStore` port; this module
//! only holds the email value object and the events published around
//! authentication.
//!
//! # Events
//!
//! - `UserLoggedIn` - Credentials accepted, session created
//! - `UserRegistered` - Account created
//! - `UserLoggedOut` - Session ended by the user
//! - `PasswordChanged` - Password replaced, sessions revoked

mod email;
mod events;

pub use email::Email;
pub use events::{PasswordChanged, UserLoggedIn, UserLoggedOut, UserRegistered};
