//! Route definitions for the Stratus HTTP API.
//!
//! All routes are mounted under `/api`. The router receives `AppState`
//! and passes it to all handlers via Axum's `State` extractor.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post, put},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let max_upload = state.config.storage.max_upload_size_bytes as usize;

    let api_routes = Router::new()
        .merge(file_routes())
        .merge(storage_routes())
        .merge(share_routes())
        .merge(health_routes());

    let cors = build_cors_layer(&state);

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(max_upload))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// File lifecycle, versioning, and bulk operations
fn file_routes() -> Router<AppState> {
    Router::new()
        .route("/files", post(handlers::file::upload))
        .route("/files", get(handlers::file::list_files))
        .route("/files/bulk", post(handlers::bulk::run_bulk))
        .route("/files/{id}", delete(handlers::file::trash_file))
        .route("/files/{id}/download", get(handlers::file::download_file))
        .route("/files/{id}/restore", post(handlers::file::restore_file))
        .route("/files/{id}/permanent", delete(handlers::file::purge_file))
        .route("/files/{id}/visibility", put(handlers::file::set_visibility))
        .route("/files/{id}/versioning", patch(handlers::file::set_versioning))
        .route("/files/{id}/versions", get(handlers::file::list_versions))
        .route(
            "/files/{id}/versions/{n}/download",
            get(handlers::file::download_version),
        )
        .route(
            "/files/{id}/versions/{n}/restore",
            post(handlers::file::restore_version),
        )
        .route(
            "/files/{id}/versions/{n}",
            delete(handlers::file::delete_version),
        )
}

/// Storage usage
fn storage_routes() -> Router<AppState> {
    Router::new().route("/storage/usage", get(handlers::storage::get_usage))
}

/// Public shared-file access (no auth)
fn share_routes() -> Router<AppState> {
    Router::new()
        .route("/shared/{token}", get(handlers::share::shared_metadata))
        .route(
            "/shared/{token}/download",
            get(handlers::share::shared_download),
        )
}

/// Health check endpoints (no auth)
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/detailed", get(handlers::health::health_detailed))
}

/// Build CORS layer from configuration
fn build_cors_layer(state: &AppState) -> CorsLayer {
    let cors_config = &state.config.server.cors;

    let mut cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if cors_config.allowed_origins.contains(&"*".to_string()) {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<axum::http::HeaderValue> = cors_config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    cors.max_age(std::time::Duration::from_secs(cors_config.max_age_seconds))
}
