//! Application state shared across all handlers.

use std::sync::Arc;

use stratus_core::config::AppConfig;
use stratus_core::traits::BlobStore;
use stratus_database::connection::DatabasePool;
use stratus_engine::file::{BulkCoordinator, LifecycleService};

/// Application state passed to every Axum handler via `State<AppState>`.
///
/// Services are cheap to clone; shared infrastructure is `Arc`-wrapped.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool, used by the health endpoints.
    pub db: DatabasePool,
    /// Blob store, used by the health endpoints.
    pub blobs: Arc<dyn BlobStore>,
    /// File lifecycle service.
    pub lifecycle: LifecycleService,
    /// Bulk operation coordinator.
    pub bulk: BulkCoordinator,
}
