//! Stratus Server — multi-tenant file lifecycle and storage accounting.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use stratus_core::config::AppConfig;
use stratus_core::error::AppError;
use stratus_core::traits::BlobStore;
use stratus_database::repositories::{PgFileStore, PgQuotaStore, PgVersionStore};
use stratus_engine::file::{BulkCoordinator, LifecycleService, VersionChain};
use stratus_engine::quota::QuotaLedger;
use stratus_storage::{LocalBlobStore, MemoryBlobStore};

#[tokio::main]
async fn main() {
    let env = std::env::var("STRATUS_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
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
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Stratus v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    let db = stratus_database::connection::DatabasePool::connect(&config.database).await?;
    stratus_database::migration::run_migrations(db.pool()).await?;

    // ── Step 2: Blob store ───────────────────────────────────────
    let blobs = build_blob_store(&config).await?;
    tracing::info!(provider = blobs.provider_type(), "Blob store initialized");

    // ── Step 3: Stores ───────────────────────────────────────────
    let file_store = Arc::new(PgFileStore::new(db.pool().clone()));
    let version_store = Arc::new(PgVersionStore::new(db.pool().clone()));
    let quota_store = Arc::new(PgQuotaStore::new(db.pool().clone()));

    // ── Step 4: Engine ───────────────────────────────────────────
    let chain = VersionChain::new(file_store.clone(), version_store);
    let ledger = QuotaLedger::new(quota_store, &config.quota);
    let lifecycle = LifecycleService::new(
        file_store,
        chain,
        ledger,
        Arc::clone(&blobs),
        &config.storage,
    );
    let bulk = BulkCoordinator::new(lifecycle.clone());

    // ── Step 5: HTTP server ──────────────────────────────────────
    let state = stratus_api::AppState {
        config: Arc::new(config.clone()),
        db,
        blobs,
        lifecycle,
        bulk,
    };

    let app = stratus_api::build_router(state);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("Stratus server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    tracing::info!("Stratus server shut down gracefully");
    Ok(())
}

/// Build the configured blob store provider
async fn build_blob_store(config: &AppConfig) -> Result<Arc<dyn BlobStore>, AppError> {
    match config.storage.provider.as_str() {
        "local" => Ok(Arc::new(
            LocalBlobStore::new(&config.storage.local.root_path).await?,
        )),
        "memory" => Ok(Arc::new(MemoryBlobStore::new())),
        other => Err(AppError::configuration(format!(
            "Unknown storage provider '{other}'"
        ))),
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
