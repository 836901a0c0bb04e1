//! The version chain manager.
//!
//! Owns the ordered set of versions for a file, version numbering, and
//! the invariant that exactly one version per file is current and that
//! the file record mirrors it.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use stratus_core::error::AppError;
use stratus_core::result::AppResult;
use stratus_database::stores::{FileStore, VersionStore};
use stratus_entity::file::{File, FileVersion};

/// Manages a file's version history.
///
/// The "unset old current / set new current" flip is issued as a single
/// store update scoped to the file id followed by the insert of the new
/// current row. A concurrent reader may briefly observe zero current
/// versions (it should fall back to `file.current_version`), but never
/// two.
#[derive(Debug, Clone)]
pub struct VersionChain {
    /// File store, for keeping the parent record's pointers in sync.
    files: Arc<dyn FileStore>,
    /// Version store.
    versions: Arc<dyn VersionStore>,
}

impl VersionChain {
    /// Creates a new version chain manager.
    pub fn new(files: Arc<dyn FileStore>, versions: Arc<dyn VersionStore>) -> Self {
        Self { files, versions }
    }

    /// Records version 1 for a freshly created file.
    ///
    /// The file record must already point at the initial content
    /// (`current_version = 1`, `total_versions = 1`).
    pub async fn create_initial(&self, file: &File) -> AppResult<FileVersion> {
        if file.size_bytes <= 0 {
            return Err(AppError::validation("Cannot version an empty file"));
        }

        let version = FileVersion::new(
            file.id,
            1,
            file.storage_key.clone(),
            file.size_bytes,
            file.mime_type.clone(),
            true,
        );
        self.versions.insert(&version).await?;
        Ok(version)
    }

    /// Appends a new current version and advances the file's pointers.
    pub async fn append(
        &self,
        file: &mut File,
        storage_key: &str,
        size_bytes: i64,
        mime_type: &str,
    ) -> AppResult<FileVersion> {
        if !file.versioning_enabled {
            return Err(AppError::invalid_operation(
                "Versioning is not enabled for this file",
            ));
        }
        if size_bytes <= 0 {
            return Err(AppError::validation("Cannot version an empty file"));
        }

        let version = FileVersion::new(
            file.id,
            file.current_version + 1,
            storage_key,
            size_bytes,
            mime_type,
            true,
        );

        // Unset-then-insert: the window where no version is current is
        // tolerated by readers; a window with two current versions is not.
        self.versions.clear_current(file.id).await?;
        self.versions.insert(&version).await?;

        file.storage_key = version.storage_key.clone();
        file.size_bytes = version.size_bytes;
        file.mime_type = version.mime_type.clone();
        file.current_version = version.version_number;
        file.total_versions += 1;
        file.updated_at = Utc::now();
        self.files.update(file).await?;

        info!(
            file_id = %file.id,
            version = version.version_number,
            "File version appended"
        );

        Ok(version)
    }

    /// Makes an older version current again, copying its content pointer
    /// back onto the file record. Restoring the already-current version
    /// is a no-op success. `total_versions` is unchanged.
    pub async fn restore(&self, file: &mut File, version_number: i32) -> AppResult<FileVersion> {
        let version = self
            .versions
            .find(file.id, version_number)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Version {version_number} not found"))
            })?;

        if version_number == file.current_version {
            return Ok(version);
        }

        self.versions.clear_current(file.id).await?;
        self.versions.set_current(file.id, version_number).await?;

        file.storage_key = version.storage_key.clone();
        file.size_bytes = version.size_bytes;
        file.mime_type = version.mime_type.clone();
        file.current_version = version_number;
        file.updated_at = Utc::now();
        self.files.update(file).await?;

        info!(
            file_id = %file.id,
            version = version_number,
            "File version restored"
        );

        Ok(version)
    }

    /// Removes a non-current version and decrements the file's count.
    ///
    /// Returns the removed version so the caller can release quota and
    /// clean up the blob. The current version can never be deleted.
    pub async fn delete_version(
        &self,
        file: &mut File,
        version_number: i32,
    ) -> AppResult<FileVersion> {
        if version_number == file.current_version {
            return Err(AppError::invalid_operation(
                "The current version cannot be deleted",
            ));
        }

        let version = self
            .versions
            .find(file.id, version_number)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Version {version_number} not found"))
            })?;

        self.versions.delete(file.id, version_number).await?;

        file.total_versions -= 1;
        file.updated_at = Utc::now();
        self.files.update(file).await?;

        info!(
            file_id = %file.id,
            version = version_number,
            "File version deleted"
        );

        Ok(version)
    }

    /// Looks up a single version of a file.
    pub async fn find(
        &self,
        file_id: Uuid,
        version_number: i32,
    ) -> AppResult<Option<FileVersion>> {
        self.versions.find(file_id, version_number).await
    }

    /// Lists a file's versions, newest first.
    pub async fn list(&self, file_id: Uuid) -> AppResult<Vec<FileVersion>> {
        self.versions.list_for_file(file_id).await
    }

    /// Removes every version record of a file. Used by purge, after the
    /// blobs are gone.
    pub async fn purge_versions(&self, file_id: Uuid) -> AppResult<u64> {
        self.versions.delete_all_for_file(file_id).await
    }
}
