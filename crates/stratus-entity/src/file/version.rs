//! File version entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An immutable snapshot of a file's bytes.
///
/// Versions are never mutated after creation except for the `is_current`
/// flag; exactly one version per file carries `is_current = true`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FileVersion {
    /// Unique version identifier.
    pub id: Uuid,
    /// The file this version belongs to.
    pub file_id: Uuid,
    /// Sequential version number, starting at 1.
    pub version_number: i32,
    /// Blob store key of this version's content.
    pub storage_key: String,
    /// Size in bytes.
    pub size_bytes: i64,
    /// MIME type.
    pub mime_type: String,
    /// Whether this is the file's current version.
    pub is_current: bool,
    /// When this version was uploaded.
    pub uploaded_at: DateTime<Utc>,
}

impl FileVersion {
    /// Create a new version snapshot.
    pub fn new(
        file_id: Uuid,
        version_number: i32,
        storage_key: impl Into<String>,
        size_bytes: i64,
        mime_type: impl Into<String>,
        is_current: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            file_id,
            version_number,
            storage_key: storage_key.into(),
            size_bytes,
            mime_type: mime_type.into(),
            is_current,
            uploaded_at: Utc::now(),
        }
    }
}
