//! In-memory implementation of SessionRepository.
//!
//! Backs tests and single-process deployments. All operations take the
//! map lock once, so each call is atomic with respect to the others.

use async_trait::async_trait;
use chrono::Duration;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, SessionId, Timestamp, UserId};
use crate::domain::session::Session;
use crate::ports::SessionRepository;

#[derive(Debug, Default)]
pub struct InMemorySessionRepository {
    sessions: RwLock<HashMap<SessionId, Session>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions in any state.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Stores a session as-is, replacing any with the same ID.
    pub async fn insert(&self, session: Session) {
        self.sessions
            .write()
            .await
            .insert(session.id().clone(), session);
    }

    fn active_for_user<'a>(
        sessions: &'a HashMap<SessionId, Session>,
        user_id: &'a UserId,
        now: Timestamp,
    ) -> impl Iterator<Item = &'a Session> + 'a {
        sessions
            .values()
            .filter(move |s| s.user_id() == user_id && s.is_valid_at(now))
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn create(&self, session: &Session) -> Result<(), DomainError> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(session.id()) {
            return Err(DomainError::new(
                ErrorCode::Conflict,
                "Session ID already exists",
            ));
        }
        sessions.insert(session.id().clone(), session.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: &SessionId) -> Result<Option<Session>, DomainError> {
        Ok(self.sessions.read().await.get(id).cloned())
    }

    async fn get_by_user_id(&self, user_id: &UserId) -> Result<Vec<Session>, DomainError> {
        let sessions = self.sessions.read().await;
        let mut result: Vec<Session> = Self::active_for_user(&sessions, user_id, Timestamp::now())
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(result)
    }

    async fn update(&self, session: &Session) -> Result<(), DomainError> {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(session.id()) {
            Some(stored) => {
                *stored = session.clone();
                Ok(())
            }
            None => Err(DomainError::session_not_found(session.id().short())),
        }
    }

    async fn delete(&self, id: &SessionId) -> Result<(), DomainError> {
        self.sessions.write().await.remove(id);
        Ok(())
    }

    async fn delete_by_user_id(&self, user_id: &UserId) -> Result<(), DomainError> {
        self.sessions
            .write()
            .await
            .retain(|_, s| s.user_id() != user_id);
        Ok(())
    }

    async fn cleanup_expired(&self) -> Result<u64, DomainError> {
        let now = Timestamp::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.is_valid_at(now));
        Ok((before - sessions.len()) as u64)
    }

    async fn validate_and_get(&self, id: &SessionId) -> Result<Option<Session>, DomainError> {
        let now = Timestamp::now();
        Ok(self
            .sessions
            .read()
            .await
            .get(id)
            .filter(|s| s.is_valid_at(now))
            .cloned())
    }

    async fn extend_session(
        &self,
        id: &SessionId,
        duration: Duration,
    ) -> Result<Session, DomainError> {
        let now = Timestamp::now();
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(id).filter(|s| s.is_valid_at(now)) {
            Some(session) => {
                session.extend(duration);
                Ok(session.clone())
            }
            None => Err(DomainError::session_not_found(id.short())),
        }
    }

    async fn invalidate_session(&self, id: &SessionId) -> Result<(), DomainError> {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(id) {
            Some(session) => {
                session.invalidate();
                Ok(())
            }
            None => Err(DomainError::session_not_found(id.short())),
        }
    }

    async fn count_active_sessions(&self, user_id: &UserId) -> Result<u32, DomainError> {
        let sessions = self.sessions.read().await;
        let count = Self::active_for_user(&sessions, user_id, Timestamp::now()).count();
        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }

    async fn get_oldest_sessions_by_user(
        &self,
        user_id: &UserId,
        limit: u32,
    ) -> Result<Vec<Session>, DomainError> {
        let sessions = self.sessions.read().await;
        let mut result: Vec<Session> = Self::active_for_user(&sessions, user_id, Timestamp::now())
            .cloned()
            .collect();
        result.sort_by(|a, b| a.created_at().cmp(&b.created_at()));
        result.truncate(limit as usize);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::session::SessionConfig;

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    fn session_for(user_id: &UserId) -> Session {
        Session::new(user_id.clone(), "10.0.0.1", "Firefox", &SessionConfig::default()).unwrap()
    }

    fn session_with(
        user_id: &UserId,
        created_offset: Duration,
        expires_offset: Duration,
        is_active: bool,
    ) -> Session {
        let now = Timestamp::now();
        Session::reconstitute(
            SessionId::generate().unwrap(),
            user_id.clone(),
            now.plus(created_offset),
            now.plus(expires_offset),
            "10.0.0.1".to_string(),
            "Firefox".to_string(),
            is_active,
        )
    }

    #[tokio::test]
    async fn create_then_get_by_id() {
        let repo = InMemorySessionRepository::new();
        let session = session_for(&user("u1"));

        repo.create(&session).await.unwrap();

        assert_eq!(repo.get_by_id(session.id()).await.unwrap(), Some(session));
    }

    #[tokio::test]
    async fn create_rejects_duplicate_id() {
        let repo = InMemorySessionRepository::new();
        let session = session_for(&user("u1"));
        repo.create(&session).await.unwrap();

        let err = repo.create(&session).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn validate_and_get_hides_expired_and_inactive() {
        let repo = InMemorySessionRepository::new();
        let u = user("u1");
        let valid = session_with(&u, Duration::hours(-1), Duration::hours(1), true);
        let expired = session_with(&u, Duration::hours(-2), Duration::hours(-1), true);
        let inactive = session_with(&u, Duration::hours(-1), Duration::hours(1), false);
        for s in [&valid, &expired, &inactive] {
            repo.insert(s.clone()).await;
        }

        assert!(repo.validate_and_get(valid.id()).await.unwrap().is_some());
        assert!(repo.validate_and_get(expired.id()).await.unwrap().is_none());
        assert!(repo.validate_and_get(inactive.id()).await.unwrap().is_none());

        let unknown = SessionId::generate().unwrap();
        assert!(repo.validate_and_get(&unknown).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn user_listings_are_ordered_and_filtered() {
        let repo = InMemorySessionRepository::new();
        let u = user("u1");
        let oldest = session_with(&u, Duration::hours(-3), Duration::hours(1), true);
        let middle = session_with(&u, Duration::hours(-2), Duration::hours(1), true);
        let newest = session_with(&u, Duration::hours(-1), Duration::hours(1), true);
        let dead = session_with(&u, Duration::hours(-4), Duration::hours(1), false);
        let other = session_with(&user("u2"), Duration::hours(-5), Duration::hours(1), true);
        for s in [&oldest, &middle, &newest, &dead, &other] {
            repo.insert(s.clone()).await;
        }

        let newest_first: Vec<_> = repo.get_by_user_id(&u).await.unwrap();
        assert_eq!(
            newest_first.iter().map(|s| s.id().clone()).collect::<Vec<_>>(),
            vec![newest.id().clone(), middle.id().clone(), oldest.id().clone()]
        );

        let oldest_two = repo.get_oldest_sessions_by_user(&u, 2).await.unwrap();
        assert_eq!(
            oldest_two.iter().map(|s| s.id().clone()).collect::<Vec<_>>(),
            vec![oldest.id().clone(), middle.id().clone()]
        );

        assert_eq!(repo.count_active_sessions(&u).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn extend_session_requires_valid_session() {
        let repo = InMemorySessionRepository::new();
        let u = user("u1");
        let valid = session_with(&u, Duration::hours(-1), Duration::minutes(5), true);
        let expired = session_with(&u, Duration::hours(-2), Duration::hours(-1), true);
        repo.insert(valid.clone()).await;
        repo.insert(expired.clone()).await;

        let extended = repo.extend_session(valid.id(), Duration::hours(2)).await.unwrap();
        assert!(extended.expires_at().is_after(&valid.expires_at()));

        let err = repo
            .extend_session(expired.id(), Duration::hours(2))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn invalidate_session_reports_missing() {
        let repo = InMemorySessionRepository::new();
        let session = session_for(&user("u1"));
        repo.create(&session).await.unwrap();

        repo.invalidate_session(session.id()).await.unwrap();
        let stored = repo.get_by_id(session.id()).await.unwrap().unwrap();
        assert!(!stored.is_active());

        let unknown = SessionId::generate().unwrap();
        assert!(repo.invalidate_session(&unknown).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn update_requires_existing_session() {
        let repo = InMemorySessionRepository::new();
        let mut session = session_for(&user("u1"));
        assert!(repo.update(&session).await.unwrap_err().is_not_found());

        repo.create(&session).await.unwrap();
        session.invalidate();
        repo.update(&session).await.unwrap();
        assert!(!repo.get_by_id(session.id()).await.unwrap().unwrap().is_active());
    }

    #[tokio::test]
    async fn returned_sessions_are_copies() {
        let repo = InMemorySessionRepository::new();
        let session = session_for(&user("u1"));
        repo.create(&session).await.unwrap();

        let mut copy = repo.get_by_id(session.id()).await.unwrap().unwrap();
        copy.invalidate();

        assert!(repo.get_by_id(session.id()).await.unwrap().unwrap().is_active());
    }

    #[tokio::test]
    async fn cleanup_removes_exactly_expired_and_inactive() {
        let repo = InMemorySessionRepository::new();
        let u = user("u1");
        repo.insert(session_with(&u, Duration::hours(-1), Duration::hours(1), true)).await;
        repo.insert(session_with(&u, Duration::hours(-1), Duration::hours(2), true)).await;
        repo.insert(session_with(&u, Duration::hours(-2), Duration::hours(-1), true)).await;
        repo.insert(session_with(&u, Duration::hours(-1), Duration::hours(1), false)).await;

        assert_eq!(repo.cleanup_expired().await.unwrap(), 2);
        assert_eq!(repo.len().await, 2);
        assert_eq!(repo.cleanup_expired().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn delete_operations_are_idempotent() {
        let repo = InMemorySessionRepository::new();
        let u = user("u1");
        let session = session_for(&u);
        repo.create(&session).await.unwrap();
        repo.create(&session_for(&u)).await.unwrap();
        repo.create(&session_for(&user("u2"))).await.unwrap();

        repo.delete(session.id()).await.unwrap();
        repo.delete(session.id()).await.unwrap();
        assert_eq!(repo.len().await, 2);

        repo.delete_by_user_id(&u).await.unwrap();
        repo.delete_by_user_id(&u).await.unwrap();
        assert_eq!(repo.len().await, 1);
    }
}
