//! Shared fixtures for the auth handler tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::adapters::events::InMemoryEventBus;
use crate::adapters::rate_limiter::{InMemoryRateLimiter, RateLimiterConfig};
use crate::adapters::sessions::InMemorySessionRepository;
use crate::application::SessionValidator;
use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::domain::session::SessionConfig;
use crate::domain::user::Email;
use crate::ports::CredentialStore;

pub const PASSWORD: &str = "correct horse battery staple";

/// Credential store keyed by normalized email, passwords kept in clear.
#[derive(Default)]
pub struct MockCredentialStore {
    accounts: Mutex<HashMap<String, (UserId, String)>>,
    next_id: Mutex<u32>,
}

impl MockCredentialStore {
    pub fn with_account(email: &str, password: &str) -> (Self, UserId) {
        let store = Self::default();
        let user_id = store.add(email, password);
        (store, user_id)
    }

    pub fn add(&self, email: &str, password: &str) -> UserId {
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        let user_id = UserId::new(format!("user-{}", *next)).unwrap();
        self.accounts.lock().unwrap().insert(
            Email::parse(email).unwrap().as_str().to_string(),
            (user_id.clone(), password.to_string()),
        );
        user_id
    }

    pub fn password_of(&self, user_id: &UserId) -> Option<String> {
        self.accounts
            .lock()
            .unwrap()
            .values()
            .find(|(id, _)| id == user_id)
            .map(|(_, pw)| pw.clone())
    }
}

#[async_trait]
impl CredentialStore for MockCredentialStore {
    async fn verify_credentials(
        &self,
        email: &Email,
        password: &str,
    ) -> Result<Option<UserId>, DomainError> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .get(email.as_str())
            .filter(|(_, stored)| stored == password)
            .map(|(id, _)| id.clone()))
    }

    async fn register_user(&self, email: &Email, password: &str) -> Result<UserId, DomainError> {
        if self.accounts.lock().unwrap().contains_key(email.as_str()) {
            return Err(DomainError::new(ErrorCode::Conflict, "Email already registered"));
        }
        Ok(self.add(email.as_str(), password))
    }

    async fn change_password(
        &self,
        user_id: &UserId,
        current_password: &str,
        new_password: &str,
    ) -> Result<bool, DomainError> {
        let mut accounts = self.accounts.lock().unwrap();
        match accounts.values_mut().find(|(id, _)| id == user_id) {
            Some((_, stored)) if stored == current_password => {
                *stored = new_password.to_string();
                Ok(true)
            }
            Some(_) => Ok(false),
            None => Err(DomainError::new(ErrorCode::UserNotFound, "No such user")),
        }
    }
}

/// Everything a handler needs, wired to in-memory adapters.
pub struct Harness {
    pub repository: Arc<InMemorySessionRepository>,
    pub validator: Arc<SessionValidator>,
    pub limiter: Arc<InMemoryRateLimiter>,
    pub bus: Arc<InMemoryEventBus>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_limits(3)
    }

    pub fn with_limits(max_attempts: u32) -> Self {
        let repository = Arc::new(InMemorySessionRepository::new());
        let validator = Arc::new(SessionValidator::new(
            repository.clone(),
            SessionConfig::default(),
        ));
        let limiter = Arc::new(
            InMemoryRateLimiter::new(RateLimiterConfig {
                max_attempts,
                window: Duration::from_secs(60),
                lockout_time: Duration::from_secs(300),
            })
            .unwrap(),
        );
        Self {
            repository,
            validator,
            limiter,
            bus: Arc::new(InMemoryEventBus::new()),
        }
    }
}
