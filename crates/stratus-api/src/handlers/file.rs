//! File lifecycle and version handlers.

use axum::Json;
use axum::body::Body;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use bytes::Bytes;
use uuid::Uuid;

use stratus_core::error::AppError;
use stratus_engine::file::UploadParams;
use stratus_entity::file::{File, FileVersion};

use crate::dto::request::{ListFilesQuery, SetVersioningRequest, SetVisibilityRequest};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/files — multipart upload
pub async fn upload(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<File>>, ApiError> {
    let mut file_name: Option<String> = None;
    let mut mime_type: Option<String> = None;
    let mut data: Option<Bytes> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?
    {
        if field.name() == Some("file") {
            file_name = field.file_name().map(String::from);
            mime_type = field.content_type().map(String::from);
            data = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| AppError::validation(format!("Read error: {e}")))?,
            );
        }
    }

    let file_name = file_name.ok_or_else(|| AppError::validation("file field is required"))?;
    let data = data.ok_or_else(|| AppError::validation("file data is required"))?;

    let file = state
        .lifecycle
        .upload(
            auth.user_id(),
            UploadParams {
                file_name,
                mime_type,
                data,
            },
        )
        .await?;

    Ok(Json(ApiResponse::ok(file)))
}

/// GET /api/files?trashed=true
pub async fn list_files(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListFilesQuery>,
) -> Result<Json<ApiResponse<Vec<File>>>, ApiError> {
    let files = state.lifecycle.list(auth.user_id(), query.trashed).await?;
    Ok(Json(ApiResponse::ok(files)))
}

/// GET /api/files/{id}/download
pub async fn download_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let (file, data) = state.lifecycle.download(id, auth.user_id()).await?;
    Ok(attachment_response(&file, data)?)
}

/// DELETE /api/files/{id} — move to trash
pub async fn trash_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<File>>, ApiError> {
    let file = state.lifecycle.trash(id, auth.user_id()).await?;
    Ok(Json(ApiResponse::ok(file)))
}

/// POST /api/files/{id}/restore
pub async fn restore_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<File>>, ApiError> {
    let file = state.lifecycle.restore(id, auth.user_id()).await?;
    Ok(Json(ApiResponse::ok(file)))
}

/// DELETE /api/files/{id}/permanent
pub async fn purge_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.lifecycle.purge(id, auth.user_id()).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "File permanently deleted",
    ))))
}

/// PUT /api/files/{id}/visibility
pub async fn set_visibility(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<SetVisibilityRequest>,
) -> Result<Json<ApiResponse<File>>, ApiError> {
    let file = state
        .lifecycle
        .set_visibility(id, auth.user_id(), req.is_public)
        .await?;
    Ok(Json(ApiResponse::ok(file)))
}

/// PATCH /api/files/{id}/versioning
pub async fn set_versioning(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<SetVersioningRequest>,
) -> Result<Json<ApiResponse<File>>, ApiError> {
    let file = state
        .lifecycle
        .set_versioning(id, auth.user_id(), req.enabled)
        .await?;
    Ok(Json(ApiResponse::ok(file)))
}

/// GET /api/files/{id}/versions
pub async fn list_versions(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<FileVersion>>>, ApiError> {
    let versions = state.lifecycle.list_versions(id, auth.user_id()).await?;
    Ok(Json(ApiResponse::ok(versions)))
}

/// GET /api/files/{id}/versions/{n}/download
pub async fn download_version(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, version)): Path<(Uuid, i32)>,
) -> Result<Response, ApiError> {
    let (file, version, data) = state
        .lifecycle
        .download_version(id, auth.user_id(), version)
        .await?;

    let filename = versioned_file_name(&file.original_name, version.version_number);
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, version.mime_type.clone())
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        )
        .header(header::CONTENT_LENGTH, data.len())
        .body(Body::from(data))
        .map_err(|e| AppError::internal(format!("Response build failed: {e}")).into())
}

/// POST /api/files/{id}/versions/{n}/restore
pub async fn restore_version(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, version)): Path<(Uuid, i32)>,
) -> Result<Json<ApiResponse<File>>, ApiError> {
    let file = state
        .lifecycle
        .restore_version(id, auth.user_id(), version)
        .await?;
    Ok(Json(ApiResponse::ok(file)))
}

/// DELETE /api/files/{id}/versions/{n}
pub async fn delete_version(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, version)): Path<(Uuid, i32)>,
) -> Result<Json<ApiResponse<File>>, ApiError> {
    let file = state
        .lifecycle
        .delete_version(id, auth.user_id(), version)
        .await?;
    Ok(Json(ApiResponse::ok(file)))
}

/// Download name for a historical version: `report.pdf` at version 2
/// becomes `report(v2).pdf`.
fn versioned_file_name(original_name: &str, version_number: i32) -> String {
    match original_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem}(v{version_number}).{ext}"),
        _ => format!("{original_name}(v{version_number})"),
    }
}

/// Builds an attachment download response for a file's content.
pub(crate) fn attachment_response(file: &File, data: Bytes) -> Result<Response, AppError> {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, file.mime_type.clone())
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file.original_name),
        )
        .header(header::CONTENT_LENGTH, data.len())
        .body(Body::from(data))
        .map_err(|e| AppError::internal(format!("Response build failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::versioned_file_name;

    #[test]
    fn test_versioned_file_name_keeps_the_extension_last() {
        assert_eq!(versioned_file_name("report.pdf", 2), "report(v2).pdf");
        assert_eq!(versioned_file_name("notes", 3), "notes(v3)");
        assert_eq!(versioned_file_name(".env", 1), ".env(v1)");
    }
}
