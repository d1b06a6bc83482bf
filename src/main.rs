//! ShareHub Server for share links and family chat
//!
//! Main entry point that wires all crates together and runs until a
//! shutdown signal arrives.

use std::sync::Arc;

use tracing;
use tracing_subscriber::{EnvFilter, fmt};

use sharehub_auth::password::PasswordHasher;
use sharehub_core::config::AppConfig;
use sharehub_core::error::AppError;
use sharehub_core::traits::ResourceCatalog;
use sharehub_entity::resource::ResourceHandle;
use sharehub_realtime::RealtimeEngine;
use sharehub_service::share::{AccessGate, LinkService, MemoryShareRegistry, ShareService};
use sharehub_service::storage::MemoryResourceCatalog;
use sharehub_worker::{CronScheduler, ShareSweepJob};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from files and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("SHAREHUB_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting ShareHub v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Share links ──────────────────────────────────────
    let password_hasher = Arc::new(PasswordHasher::new());
    let link_service = Arc::new(LinkService::new(config.share.token_bytes));
    let registry = Arc::new(MemoryShareRegistry::new(
        AccessGate::new(Arc::clone(&password_hasher)),
        link_service,
        config.share.max_token_attempts,
    ));
    let catalog: Arc<dyn ResourceCatalog<ResourceHandle>> = Arc::new(MemoryResourceCatalog::new());
    let share_service = Arc::new(ShareService::new(
        registry,
        catalog,
        Arc::clone(&password_hasher),
        config.share.clone(),
    ));
    tracing::info!(
        default_ttl_hours = config.share.default_ttl_hours,
        "Share service initialized"
    );

    // ── Step 2: Realtime engine ──────────────────────────────────
    let realtime_engine = Arc::new(RealtimeEngine::new(&config.realtime, &config.chat));

    // ── Step 3: Scheduled maintenance ────────────────────────────
    let scheduler = CronScheduler::new(config.worker.clone()).await?;
    scheduler
        .register_default_tasks(ShareSweepJob::new(Arc::clone(&share_service)))
        .await?;
    scheduler.start().await?;

    tracing::info!("ShareHub core running; press Ctrl+C to stop");

    // ── Step 4: Graceful shutdown ────────────────────────────────
    shutdown_signal().await;
    tracing::info!("Shutdown signal received, starting graceful shutdown...");

    scheduler.shutdown().await?;
    realtime_engine.shutdown().await?;

    let metrics = realtime_engine.metrics.snapshot();
    tracing::info!(
        connections_total = metrics.connections_total,
        chat_messages_total = metrics.chat_messages_total,
        "ShareHub server shut down gracefully"
    );
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
