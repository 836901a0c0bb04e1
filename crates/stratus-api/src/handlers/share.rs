//! Public shared-file handlers. No authentication: access is granted by
//! knowledge of the share token alone.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::Response;

use stratus_entity::file::File;

use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::handlers::file::attachment_response;
use crate::state::AppState;

/// GET /api/shared/{token}
pub async fn shared_metadata(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<ApiResponse<File>>, ApiError> {
    let file = state.lifecycle.shared(&token).await?;
    Ok(Json(ApiResponse::ok(file)))
}

/// GET /api/shared/{token}/download
pub async fn shared_download(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Response, ApiError> {
    let (file, data) = state.lifecycle.shared_download(&token).await?;
    Ok(attachment_response(&file, data)?)
}
