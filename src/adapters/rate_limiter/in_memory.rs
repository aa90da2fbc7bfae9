//! In-memory sliding-window rate limiter with lockout.
//!
//! Single-process only: counters live in this instance and are not shared
//! between nodes.

use async_trait::async_trait;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::ports::{RateLimitDecision, RateLimitDenied, RateLimiter};

use super::config::{InvalidRateLimiterConfig, RateLimiterConfig, MAX_RATE_LIMIT_DURATION};

/// Default period between stale-record sweeps.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Shortest sweep period; smaller requests are raised to it.
pub const MIN_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// In-memory rate limiter for one action class.
///
/// One mutex guards the whole key space, so the read-check-mutate
/// sequence of `allow` is linearized per key (and across keys).
#[derive(Debug, Clone)]
pub struct InMemoryRateLimiter {
    config: RateLimiterConfig,
    attempts: Arc<Mutex<HashMap<String, AttemptRecord>>>,
}

/// Attempt history for a single key.
#[derive(Debug, Clone)]
struct AttemptRecord {
    count: u32,
    first_attempt: Instant,
    last_attempt: Instant,
    locked_until: Option<Instant>,
}

impl AttemptRecord {
    fn fresh(now: Instant) -> Self {
        Self {
            count: 1,
            first_attempt: now,
            last_attempt: now,
            locked_until: None,
        }
    }
}

impl InMemoryRateLimiter {
    /// Creates a limiter after validating `config`.
    pub fn new(config: RateLimiterConfig) -> Result<Self, InvalidRateLimiterConfig> {
        config.validate()?;
        Ok(Self {
            config,
            attempts: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    /// Limiter using the login preset.
    pub fn login() -> Self {
        Self::from_preset(RateLimiterConfig::login())
    }

    /// Limiter using the registration preset.
    pub fn registration() -> Self {
        Self::from_preset(RateLimiterConfig::registration())
    }

    fn from_preset(config: RateLimiterConfig) -> Self {
        Self {
            config,
            attempts: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn config(&self) -> &RateLimiterConfig {
        &self.config
    }

    /// Number of keys currently tracked.
    pub async fn tracked_keys(&self) -> usize {
        self.attempts.lock().await.len()
    }

    /// Removes records untouched for longer than `window + lockout_time`.
    ///
    /// Returns the number of records removed.
    pub async fn sweep_stale(&self) -> usize {
        sweep(&self.attempts, self.config.stale_after()).await
    }

    /// Spawns a task that calls `sweep_stale` every `interval` until
    /// `shutdown` is cancelled.
    ///
    /// `interval` is clamped to `MIN_SWEEP_INTERVAL..=MAX_RATE_LIMIT_DURATION`.
    pub fn spawn_sweeper(&self, interval: Duration, shutdown: CancellationToken) -> JoinHandle<()> {
        let interval = interval.clamp(MIN_SWEEP_INTERVAL, MAX_RATE_LIMIT_DURATION);
        let attempts = Arc::clone(&self.attempts);
        let stale_after = self.config.stale_after();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            info!(interval_secs = interval.as_secs(), "Rate limiter sweeper started");

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let removed = sweep(&attempts, stale_after).await;
                        if removed > 0 {
                            debug!(removed, "Swept stale rate limit records");
                        }
                    }
                    _ = shutdown.cancelled() => {
                        info!("Rate limiter sweeper shutting down");
                        break;
                    }
                }
            }
        })
    }

    fn evaluate(&self, record: &mut AttemptRecord, now: Instant) -> RateLimitDecision {
        if let Some(locked_until) = record.locked_until {
            if now < locked_until {
                return RateLimitDecision::Denied(RateLimitDenied::new(locked_until - now));
            }
            *record = AttemptRecord::fresh(now);
            return RateLimitDecision::Allowed;
        }

        if now.duration_since(record.first_attempt) > self.config.window {
            *record = AttemptRecord::fresh(now);
            return RateLimitDecision::Allowed;
        }

        record.count += 1;
        record.last_attempt = now;

        if record.count > self.config.max_attempts {
            record.locked_until = Some(now + self.config.lockout_time);
            return RateLimitDecision::Denied(RateLimitDenied::new(self.config.lockout_time));
        }

        RateLimitDecision::Allowed
    }
}

async fn sweep(attempts: &Mutex<HashMap<String, AttemptRecord>>, stale_after: Duration) -> usize {
    let now = Instant::now();
    let mut attempts = attempts.lock().await;
    let before = attempts.len();
    attempts.retain(|_, record| now.duration_since(record.last_attempt) <= stale_after);
    before - attempts.len()
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn allow(&self, key: &str) -> RateLimitDecision {
        let now = Instant::now();
        let mut attempts = self.attempts.lock().await;

        let record = match attempts.entry(key.to_string()) {
            Entry::Vacant(entry) => {
                entry.insert(AttemptRecord::fresh(now));
                return RateLimitDecision::Allowed;
            }
            Entry::Occupied(entry) => entry.into_mut(),
        };

        let was_locked = record.locked_until.is_some();
        let decision = self.evaluate(record, now);

        if let RateLimitDecision::Denied(denied) = &decision {
            if was_locked {
                debug!(key, retry_after_secs = denied.retry_after.as_secs(), "Rate limited");
            } else {
                warn!(
                    key,
                    lockout_secs = self.config.lockout_time.as_secs(),
                    "Rate limit exceeded, key locked out"
                );
            }
        }
        decision
    }

    async fn reset(&self, key: &str) {
        self.attempts.lock().await.remove(key);
    }

    async fn get_attempts(&self, key: &str) -> u32 {
        self.attempts
            .lock()
            .await
            .get(key)
            .map(|record| record.count)
            .unwrap_or(0)
    }
}
