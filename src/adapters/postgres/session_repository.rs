//! PostgreSQL implementation of SessionRepository.
//!
//! Validity is always judged against the application clock (bound as a
//! parameter) so that the database and the in-process rules agree on
//! what "now" means.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{DomainError, ErrorCode, SessionId, Timestamp, UserId};
use crate::domain::session::Session;
use crate::ports::SessionRepository;

const SESSION_COLUMNS: &str =
    "id, user_id, created_at, expires_at, ip_address, user_agent, is_active";

const UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL implementation of SessionRepository.
#[derive(Clone)]
pub struct PostgresSessionRepository {
    pool: PgPool,
}

impl PostgresSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for PostgresSessionRepository {
    async fn create(&self, session: &Session) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO sessions (
                id, user_id, created_at, expires_at, ip_address, user_agent, is_active
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(session.id().as_str())
        .bind(session.user_id().as_str())
        .bind(session.created_at().as_datetime())
        .bind(session.expires_at().as_datetime())
        .bind(session.ip_address())
        .bind(session.user_agent())
        .bind(session.is_active())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::new(ErrorCode::Conflict, "Session ID already exists")
            } else {
                DomainError::database("Failed to insert session", e)
            }
        })?;

        Ok(())
    }

    async fn get_by_id(&self, id: &SessionId) -> Result<Option<Session>, DomainError> {
        let row = sqlx::query(&format!("SELECT {} FROM sessions WHERE id = $1", SESSION_COLUMNS))
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to fetch session", e))?;

        row.map(row_to_session).transpose()
    }

    async fn get_by_user_id(&self, user_id: &UserId) -> Result<Vec<Session>, DomainError> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {} FROM sessions
            WHERE user_id = $1 AND is_active AND expires_at > $2
            ORDER BY created_at DESC
            "#,
            SESSION_COLUMNS
        ))
        .bind(user_id.as_str())
        .bind(now())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to fetch sessions by user", e))?;

        rows.into_iter().map(row_to_session).collect()
    }

    async fn update(&self, session: &Session) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE sessions SET
                expires_at = $2,
                ip_address = $3,
                user_agent = $4,
                is_active = $5
            WHERE id = $1
            "#,
        )
        .bind(session.id().as_str())
        .bind(session.expires_at().as_datetime())
        .bind(session.ip_address())
        .bind(session.user_agent())
        .bind(session.is_active())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to update session", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::session_not_found(session.id().short()));
        }

        Ok(())
    }

    async fn delete(&self, id: &SessionId) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to delete session", e))?;

        Ok(())
    }

    async fn delete_by_user_id(&self, user_id: &UserId) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM sessions WHERE user_id = $1")
            .bind(user_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to delete user sessions", e))?;

        Ok(())
    }

    async fn cleanup_expired(&self) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= $1 OR NOT is_active")
            .bind(now())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to clean up sessions", e))?;

        Ok(result.rows_affected())
    }

    async fn validate_and_get(&self, id: &SessionId) -> Result<Option<Session>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM sessions WHERE id = $1 AND is_active AND expires_at > $2",
            SESSION_COLUMNS
        ))
        .bind(id.as_str())
        .bind(now())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to validate session", e))?;

        row.map(row_to_session).transpose()
    }

    async fn extend_session(
        &self,
        id: &SessionId,
        duration: Duration,
    ) -> Result<Session, DomainError> {
        let now = Timestamp::now();
        let row = sqlx::query(&format!(
            r#"
            UPDATE sessions SET expires_at = $2
            WHERE id = $1 AND is_active AND expires_at > $3
            RETURNING {}
            "#,
            SESSION_COLUMNS
        ))
        .bind(id.as_str())
        .bind(now.plus(duration).as_datetime())
        .bind(now.as_datetime())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to extend session", e))?;

        match row {
            Some(row) => row_to_session(row),
            None => Err(DomainError::session_not_found(id.short())),
        }
    }

    async fn invalidate_session(&self, id: &SessionId) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE sessions SET is_active = FALSE WHERE id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to invalidate session", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::session_not_found(id.short()));
        }

        Ok(())
    }

    async fn count_active_sessions(&self, user_id: &UserId) -> Result<u32, DomainError> {
        let result: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sessions WHERE user_id = $1 AND is_active AND expires_at > $2",
        )
        .bind(user_id.as_str())
        .bind(now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to count active sessions", e))?;

        Ok(u32::try_from(result.0).unwrap_or(u32::MAX))
    }

    async fn get_oldest_sessions_by_user(
        &self,
        user_id: &UserId,
        limit: u32,
    ) -> Result<Vec<Session>, DomainError> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {} FROM sessions
            WHERE user_id = $1 AND is_active AND expires_at > $2
            ORDER BY created_at ASC
            LIMIT $3
            "#,
            SESSION_COLUMNS
        ))
        .bind(user_id.as_str())
        .bind(now())
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to fetch oldest sessions", e))?;

        rows.into_iter().map(row_to_session).collect()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

fn now() -> DateTime<Utc> {
    *Timestamp::now().as_datetime()
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == UNIQUE_VIOLATION)
}

fn column<'r, T>(row: &'r PgRow, name: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(name)
        .map_err(|e| DomainError::database(&format!("Failed to get {}", name), e))
}

fn row_to_session(row: PgRow) -> Result<Session, DomainError> {
    let id: String = column(&row, "id")?;
    let user_id: String = column(&row, "user_id")?;
    let created_at: DateTime<Utc> = column(&row, "created_at")?;
    let expires_at: DateTime<Utc> = column(&row, "expires_at")?;
    let ip_address: String = column(&row, "ip_address")?;
    let user_agent: String = column(&row, "user_agent")?;
    let is_active: bool = column(&row, "is_active")?;

    Ok(Session::reconstitute(
        SessionId::parse(&id).map_err(|e| DomainError::database("Invalid session id", e))?,
        UserId::new(user_id).map_err(|e| DomainError::database("Invalid user_id", e))?,
        Timestamp::from_datetime(created_at),
        Timestamp::from_datetime(expires_at),
        ip_address,
        user_agent,
        is_active,
    ))
}
