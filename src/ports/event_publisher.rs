//! EventPublisher port - Interface for publishing domain events.
//!
//! The engine publishes authentication events without knowing the
//! transport behind them.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EventEnvelope};

/// Port for publishing domain events.
///
/// Publication is fire-and-forget from the engine's point of view: a
/// command that already changed state is not failed because an event
/// could not be delivered. Implementations still report errors so the
/// caller can log them.
///
/// # Example
///
/// ```ignore
/// let event = UserLoggedOut { .. };
/// publisher.publish(event.to_envelope()).await?;
/// ```
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish a single event.
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError>;

    /// Publish multiple events in order.
    ///
    /// Adapters without batch support publish sequentially and stop at the
    /// first failure.
    async fn publish_all(&self, events: Vec<EventEnvelope>) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_publisher_is_object_safe() {
        fn _accepts_dyn(_publisher: &dyn EventPublisher) {}
    }
}
