//! Session maintenance daemon.
//!
//! Connects to the Postgres session store, optionally applies migrations,
//! and runs the expired-session sweep until interrupted. Request handling
//! lives in the embedding application (see `application::AuthAppState`).

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use gatekeeper::adapters::PostgresSessionRepository;
use gatekeeper::application::SessionCleanupService;
use gatekeeper::config::{AppConfig, LoggingConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;
    init_tracing(&config.logging)?;

    let pool = config.database.connect().await?;
    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("Session migrations applied");
    }

    let shutdown = CancellationToken::new();
    let cleanup = SessionCleanupService::new(
        Arc::new(PostgresSessionRepository::new(pool)),
        config.session.cleanup_interval(),
        shutdown.clone(),
    );
    cleanup.start();

    info!(
        cleanup_interval_secs = config.session.cleanup_interval_secs,
        "Session sweep running"
    );

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");

    shutdown.cancel();
    cleanup.stop().await;

    info!("Stopped");
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let registry = tracing_subscriber::registry().with(logging.env_filter()?);
    if logging.json {
        registry.with(tracing_subscriber::fmt::layer().json()).try_init()?;
    } else {
        registry.with(tracing_subscriber::fmt::layer().pretty()).try_init()?;
    }
    Ok(())
}
