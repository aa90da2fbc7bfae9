//! In-memory event bus.
//!
//! Records published envelopes and fans them out to in-process
//! subscribers over a broadcast channel. Only the most recent
//! `history_limit` envelopes are kept; nothing survives a restart.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};
use tokio::sync::broadcast;

use crate::domain::foundation::{DomainError, ErrorCode, EventEnvelope};
use crate::ports::EventPublisher;

const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Envelopes retained for inspection before the oldest are dropped.
pub const DEFAULT_HISTORY_LIMIT: usize = 10_000;

/// In-memory event bus.
///
/// # Example
///
/// ```ignore
/// let bus = Arc::new(InMemoryEventBus::new());
/// let mut events = bus.subscribe();
///
/// bus.publish(envelope).await?;
///
/// assert_eq!(bus.event_count(), 1);
/// assert!(bus.has_event("user.logged_in"));
/// ```
pub struct InMemoryEventBus {
    published: Mutex<VecDeque<EventEnvelope>>,
    history_limit: usize,
    sender: broadcast::Sender<EventEnvelope>,
    failing: AtomicBool,
}

impl InMemoryEventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Creates a bus whose subscribers lag after `capacity` unread events.
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            published: Mutex::new(VecDeque::new()),
            history_limit: DEFAULT_HISTORY_LIMIT,
            sender,
            failing: AtomicBool::new(false),
        }
    }

    /// Keeps at most `limit` envelopes (at least one), dropping the oldest.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit.max(1);
        self
    }

    /// Receives every envelope published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }

    /// Makes subsequent publishes fail (for exercising error paths).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    // === Inspection ===

    /// Returns retained events in publication order.
    pub fn published_events(&self) -> Vec<EventEnvelope> {
        self.records().iter().cloned().collect()
    }

    /// Returns events of a specific type.
    pub fn events_of_type(&self, event_type: &str) -> Vec<EventEnvelope> {
        self.records()
            .iter()
            .filter(|e| e.event_type == event_type)
            .cloned()
            .collect()
    }

    /// Returns events for a specific aggregate.
    pub fn events_for_aggregate(&self, aggregate_id: &str) -> Vec<EventEnvelope> {
        self.records()
            .iter()
            .filter(|e| e.aggregate_id == aggregate_id)
            .cloned()
            .collect()
    }

    pub fn event_count(&self) -> usize {
        self.records().len()
    }

    pub fn has_event(&self, event_type: &str) -> bool {
        self.records().iter().any(|e| e.event_type == event_type)
    }

    pub fn clear(&self) {
        self.records().clear();
    }

    // A poisoned lock only means another thread panicked mid-push; the
    // queue itself is still usable.
    fn records(&self) -> MutexGuard<'_, VecDeque<EventEnvelope>> {
        self.published.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DomainError::new(
                ErrorCode::InternalError,
                format!("Event bus unavailable, dropped {}", event.event_type),
            ));
        }

        {
            let mut records = self.records();
            if records.len() >= self.history_limit {
                records.pop_front();
            }
            records.push_back(event.clone());
        }

        // No receivers is not an error; the record above is kept either way.
        let _ = self.sender.send(event);
        Ok(())
    }

    async fn publish_all(&self, events: Vec<EventEnvelope>) -> Result<(), DomainError> {
        for event in events {
            self.publish(event).await?;
        }
        Ok(())
    }
}
