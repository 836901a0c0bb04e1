//! `AuthUser` extractor — reads the caller identity from the
//! `x-user-id` header set by the upstream auth proxy.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use stratus_core::error::AppError;

use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated user's id, available in handlers.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Uuid);

impl AuthUser {
    /// Returns the user id.
    pub fn user_id(&self) -> Uuid {
        self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("x-user-id")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError(AppError::unauthorized("Missing x-user-id header")))?;

        let user_id = header
            .parse::<Uuid>()
            .map_err(|_| ApiError(AppError::unauthorized("Invalid x-user-id header")))?;

        Ok(AuthUser(user_id))
    }
}
