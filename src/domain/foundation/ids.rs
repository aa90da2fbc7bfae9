//! Strongly-typed identifier value objects.

use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// Number of random bytes behind a session identifier (256 bits).
pub const SESSION_ID_BYTES: usize = SESSION_ID_HEX_LEN / 2;

const SESSION_ID_HEX_LEN: usize = 64;

/// Opaque identifier of an authenticated session.
///
/// Always 64 lowercase hexadecimal characters encoding 32 bytes drawn from
/// the operating system's CSPRNG.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionId(String);

impl SessionId {
    /// Generates a fresh identifier from the OS entropy source.
    ///
    /// Fails only when the entropy source is unavailable.
    pub fn generate() -> Result<Self, rand::Error> {
        let mut bytes = [0u8; SESSION_ID_BYTES];
        OsRng.try_fill_bytes(&mut bytes)?;
        Ok(Self(hex::encode(bytes)))
    }

    /// Parses an identifier received from a client or from storage.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        if value.is_empty() {
            return Err(ValidationError::empty_field("session_id"));
        }
        if value.len() != SESSION_ID_HEX_LEN {
            return Err(ValidationError::invalid_format(
                "session_id",
                format!("expected {} characters, got {}", SESSION_ID_HEX_LEN, value.len()),
            ));
        }
        if !value.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return Err(ValidationError::invalid_format(
                "session_id",
                "expected lowercase hexadecimal",
            ));
        }
        Ok(Self(value.to_string()))
    }

    /// Returns the full identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns a short prefix that is safe to write to logs.
    pub fn short(&self) -> &str {
        &self.0[..8]
    }
}

// Never print the full token through Debug.
impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionId({}…)", self.short())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for SessionId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SessionId> for String {
    fn from(id: SessionId) -> Self {
        id.0
    }
}

/// User identifier (owned by the user store).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    /// Creates a new UserId, returning error if empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ValidationError::empty_field("user_id"));
        }
        Ok(Self(id))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generated_session_id_is_64_lowercase_hex_chars() {
        let id = SessionId::generate().unwrap();

        assert_eq!(id.as_str().len(), 64);
        assert!(id
            .as_str()
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn generated_session_ids_are_unique() {
        let ids: HashSet<SessionId> = (0..1000).map(|_| SessionId::generate().unwrap()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn parse_accepts_generated_id() {
        let id = SessionId::generate().unwrap();
        let parsed = SessionId::parse(id.as_str()).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn parse_rejects_empty() {
        assert!(matches!(
            SessionId::parse(""),
            Err(ValidationError::EmptyField { .. })
        ));
    }

    #[test]
    fn parse_rejects_wrong_length() {
        assert!(SessionId::parse("abc123").is_err());
    }

    #[test]
    fn parse_rejects_uppercase_hex() {
        let upper = "A".repeat(64);
        assert!(SessionId::parse(&upper).is_err());
    }

    #[test]
    fn debug_output_truncates_token() {
        let id = SessionId::generate().unwrap();
        let debug = format!("{:?}", id);
        assert!(!debug.contains(id.as_str()));
        assert!(debug.contains(id.short()));
    }

    #[test]
    fn session_id_deserialization_validates() {
        let bad: Result<SessionId, _> = serde_json::from_str("\"not-a-token\"");
        assert!(bad.is_err());

        let id = SessionId::generate().unwrap();
        let json = serde_json::to_string(&id).unwrap();
        let restored: SessionId = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, id);
    }

    #[test]
    fn user_id_rejects_empty() {
        assert!(UserId::new("").is_err());
    }

    #[test]
    fn user_id_displays_inner_value() {
        let id = UserId::new("user-123").unwrap();
        assert_eq!(id.to_string(), "user-123");
        assert_eq!(id.as_str(), "user-123");
    }
}
