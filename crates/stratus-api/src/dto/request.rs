//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use stratus_engine::file::BulkAction;

/// Visibility change request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetVisibilityRequest {
    /// Whether the file should be publicly accessible.
    pub is_public: bool,
}

/// Versioning toggle request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetVersioningRequest {
    /// Whether re-uploads under the same name should append versions.
    pub enabled: bool,
}

/// Bulk operation request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BulkRequest {
    /// The action to apply to every file.
    pub action: BulkAction,
    /// Target file ids.
    #[validate(length(min = 1, max = 100, message = "Between 1 and 100 file ids are required"))]
    pub file_ids: Vec<Uuid>,
}

/// List query parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListFilesQuery {
    /// Select the trash view instead of active files.
    #[serde(default)]
    pub trashed: bool,
}
