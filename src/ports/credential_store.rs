//! Credential store port.
//!
//! Password hashing and account persistence live behind this port. The
//! engine never sees a password hash.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::user::Email;

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Returns the account's user ID if the password matches.
    ///
    /// Unknown emails and wrong passwords are both `Ok(None)`.
    async fn verify_credentials(
        &self,
        email: &Email,
        password: &str,
    ) -> Result<Option<UserId>, DomainError>;

    /// Creates an account.
    ///
    /// # Errors
    ///
    /// - `Conflict` if the email is already registered
    async fn register_user(&self, email: &Email, password: &str) -> Result<UserId, DomainError>;

    /// Replaces the password if `current_password` matches.
    ///
    /// Returns `false` when the current password is wrong.
    async fn change_password(
        &self,
        user_id: &UserId,
        current_password: &str,
        new_password: &str,
    ) -> Result<bool, DomainError>;
}
