//! Storage usage handler.

use axum::Json;
use axum::extract::State;

use stratus_entity::user::QuotaSnapshot;

use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/storage/usage
pub async fn get_usage(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<QuotaSnapshot>>, ApiError> {
    let snapshot = state.lifecycle.quota(auth.user_id()).await?;
    Ok(Json(ApiResponse::ok(snapshot)))
}
