//! File entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A file stored in Stratus.
///
/// A file moves through three lifecycle states: active, trashed
/// (`is_deleted = true`), and purged (the record no longer exists).
/// `storage_key` and `size_bytes` always mirror the version whose
/// `version_number` equals `current_version`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct File {
    /// Unique file identifier.
    pub id: Uuid,
    /// The file owner.
    pub owner_id: Uuid,
    /// The file name as uploaded (including extension).
    pub original_name: String,
    /// Blob store key of the current version's content.
    pub storage_key: String,
    /// Size of the current version in bytes.
    pub size_bytes: i64,
    /// MIME type of the current version.
    pub mime_type: String,
    /// Whether the file is publicly accessible via its share token.
    pub is_public: bool,
    /// Opaque URL-safe share token, unique across all files when present.
    pub share_token: Option<String>,
    /// Whether the file is in the trash.
    pub is_deleted: bool,
    /// When the file was moved to the trash.
    pub deleted_at: Option<DateTime<Utc>>,
    /// Version number of the current version (>= 1).
    pub current_version: i32,
    /// Number of versions retained for this file (>= 1).
    pub total_versions: i32,
    /// Whether re-uploading under the same name appends a version.
    pub versioning_enabled: bool,
    /// When the file was created.
    pub created_at: DateTime<Utc>,
    /// When the file was last updated.
    pub updated_at: DateTime<Utc>,
}

impl File {
    /// Create a new active file record pointing at its initial version.
    pub fn create(payload: CreateFile) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id: payload.owner_id,
            original_name: payload.original_name,
            storage_key: payload.storage_key,
            size_bytes: payload.size_bytes,
            mime_type: payload.mime_type,
            is_public: false,
            share_token: None,
            is_deleted: false,
            deleted_at: None,
            current_version: 1,
            total_versions: 1,
            versioning_enabled: payload.versioning_enabled,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if the file is in the trash.
    pub fn is_trashed(&self) -> bool {
        self.is_deleted
    }

    /// Move the file to the trash.
    pub fn mark_trashed(&mut self) {
        let now = Utc::now();
        self.is_deleted = true;
        self.deleted_at = Some(now);
        self.updated_at = now;
    }

    /// Bring the file back from the trash.
    pub fn mark_restored(&mut self) {
        self.is_deleted = false;
        self.deleted_at = None;
        self.updated_at = Utc::now();
    }
}

/// Data required to create a new file record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFile {
    /// The file owner.
    pub owner_id: Uuid,
    /// The file name.
    pub original_name: String,
    /// Blob store key of the initial content.
    pub storage_key: String,
    /// Size in bytes.
    pub size_bytes: i64,
    /// MIME type.
    pub mime_type: String,
    /// Whether versioning is enabled for this file.
    pub versioning_enabled: bool,
}
