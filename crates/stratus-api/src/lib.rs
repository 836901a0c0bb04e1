//! # stratus-api
//!
//! HTTP API layer for Stratus built on Axum.
//!
//! A thin surface over `stratus-engine`: routes map 1:1 onto engine
//! operations, identity comes from the `x-user-id` header set by the
//! upstream auth proxy, and domain errors are translated to HTTP status
//! codes in one place.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
