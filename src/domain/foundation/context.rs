//! Request context for auth command handlers.
//!
//! Every inbound authentication request carries the client fingerprint
//! (IP address and user agent) and optional correlation context. Handlers
//! accept a single `RequestContext` instead of loose parameters and
//! propagate it into the events they publish.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Client fingerprint and tracing context for one inbound request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    /// Remote IP address as seen by the transport layer.
    pub ip_address: String,

    /// Raw `User-Agent` header value (empty when absent).
    pub user_agent: String,

    /// Links related operations across a single request.
    #[serde(skip_serializing_if = "Option::is_none")]
    correlation_id: Option<String>,
}

impl RequestContext {
    /// Creates a context for a client fingerprint.
    pub fn new(ip_address: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            ip_address: ip_address.into(),
            user_agent: user_agent.into(),
            correlation_id: None,
        }
    }

    /// Builder: Add correlation ID for request tracing.
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    /// Returns the correlation ID, generating one if not set.
    pub fn correlation_id(&self) -> String {
        self.correlation_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string())
    }

    /// Returns the correlation ID only if explicitly set.
    pub fn correlation_id_opt(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }
}

#[cfg(test)]
impl RequestContext {
    /// Creates a test fixture from a fixed fingerprint.
    pub fn test_fixture() -> Self {
        Self::new("203.0.113.7", "Mozilla/5.0 (X11; Linux x86_64)")
            .with_correlation_id("test-correlation-id")
    }
}
