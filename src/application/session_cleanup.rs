//! SessionCleanupService - periodic purge of expired and inactive sessions.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::domain::session::SessionError;
use crate::ports::SessionRepository;

/// Default period between cleanup runs.
pub const DEFAULT_CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Bounds applied to the interval passed to `SessionCleanupService::new`.
pub const MIN_CLEANUP_INTERVAL: Duration = Duration::from_secs(1);
pub const MAX_CLEANUP_INTERVAL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Background task that calls `cleanup_expired` once on start and then
/// every `interval`.
///
/// The loop ends on whichever comes first: `stop()` or cancellation of the
/// token passed to `new`. A failed cycle is logged and the loop carries on.
pub struct SessionCleanupService {
    repository: Arc<dyn SessionRepository>,
    interval: Duration,
    shutdown: CancellationToken,
    running: Mutex<Option<RunningLoop>>,
}

struct RunningLoop {
    stop: CancellationToken,
    handle: JoinHandle<()>,
}

impl SessionCleanupService {
    /// `interval` is clamped to `MIN_CLEANUP_INTERVAL..=MAX_CLEANUP_INTERVAL`.
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        interval: Duration,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            repository,
            interval: interval.clamp(MIN_CLEANUP_INTERVAL, MAX_CLEANUP_INTERVAL),
            shutdown,
            running: Mutex::new(None),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Spawns the cleanup loop. Returns `false` if it is already running.
    pub fn start(&self) -> bool {
        let mut running = self.running_guard();
        if running.as_ref().is_some_and(|r| !r.handle.is_finished()) {
            return false;
        }

        let stop = CancellationToken::new();
        let handle = tokio::spawn(run_loop(
            Arc::clone(&self.repository),
            self.interval,
            stop.clone(),
            self.shutdown.clone(),
        ));

        *running = Some(RunningLoop { stop, handle });
        true
    }

    /// Signals the loop and waits until it has exited. Later calls are no-ops.
    pub async fn stop(&self) {
        let Some(running) = self.running_guard().take() else {
            return;
        };

        running.stop.cancel();
        if let Err(e) = running.handle.await {
            error!(error = %e, "Session cleanup task ended abnormally");
        }
    }

    pub fn is_running(&self) -> bool {
        self.running_guard()
            .as_ref()
            .is_some_and(|r| !r.handle.is_finished())
    }

    /// Runs one cleanup immediately, returning the number of sessions removed.
    pub async fn cleanup_now(&self) -> Result<u64, SessionError> {
        let removed = self.repository.cleanup_expired().await?;
        info!(removed, "On-demand session cleanup finished");
        Ok(removed)
    }

    // The guarded Option is always left consistent, so a poisoned lock is
    // still safe to use.
    fn running_guard(&self) -> MutexGuard<'_, Option<RunningLoop>> {
        self.running.lock().unwrap_or_else(|e| e.into_inner())
    }
}

async fn run_loop(
    repository: Arc<dyn SessionRepository>,
    interval: Duration,
    stop: CancellationToken,
    shutdown: CancellationToken,
) {
    info!(interval_secs = interval.as_secs(), "Session cleanup worker started");

    // The first tick completes immediately.
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = stop.cancelled() => {
                info!("Session cleanup worker stopped");
                break;
            }
            _ = shutdown.cancelled() => {
                info!("Session cleanup worker shutting down");
                break;
            }
            _ = ticker.tick() => {
                match repository.cleanup_expired().await {
                    Ok(removed) => debug!(removed, "Periodic session cleanup finished"),
                    Err(e) => error!(error = %e, "Periodic session cleanup failed"),
                }
            }
        }
    }
}
