//! Bulk operation handler.

use axum::Json;
use axum::extract::State;
use validator::Validate;

use stratus_core::error::AppError;
use stratus_engine::file::BulkOutcome;

use crate::dto::request::BulkRequest;
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/files/bulk
pub async fn run_bulk(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<BulkRequest>,
) -> Result<Json<ApiResponse<BulkOutcome>>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let outcome = state
        .bulk
        .run(auth.user_id(), req.action, &req.file_ids)
        .await?;
    Ok(Json(ApiResponse::ok(outcome)))
}
