//! The file lifecycle manager.
//!
//! Drives the active → trashed → purged state machine and delegates
//! version and quota changes to [`VersionChain`] and [`QuotaLedger`].
//!
//! Quota policy: an active file is charged for all of its versions.
//! Trashing releases only the current version's bytes; purging releases
//! the remaining historical versions. Restoring from the trash
//! re-reserves the current version's bytes.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{info, warn};
use uuid::Uuid;

use stratus_core::config::storage::StorageConfig;
use stratus_core::error::{AppError, ErrorKind};
use stratus_core::result::AppResult;
use stratus_core::traits::BlobStore;
use stratus_database::stores::FileStore;
use stratus_entity::file::{CreateFile, File, FileVersion};
use stratus_entity::user::QuotaSnapshot;

use crate::file::version_chain::VersionChain;
use crate::quota::QuotaLedger;
use crate::share::ShareTokenGenerator;

/// Attempts at generating a unique share token before giving up.
const SHARE_TOKEN_ATTEMPTS: u32 = 3;

/// Parameters for a file upload.
#[derive(Debug, Clone)]
pub struct UploadParams {
    /// The file name as provided by the client.
    pub file_name: String,
    /// MIME type (defaults to `application/octet-stream`).
    pub mime_type: Option<String>,
    /// File content.
    pub data: Bytes,
}

/// Handles file state transitions and storage accounting.
#[derive(Debug, Clone)]
pub struct LifecycleService {
    /// File store.
    files: Arc<dyn FileStore>,
    /// Version chain manager.
    chain: VersionChain,
    /// Quota ledger.
    ledger: QuotaLedger,
    /// Blob store.
    blobs: Arc<dyn BlobStore>,
    /// Share token generator.
    tokens: ShareTokenGenerator,
    /// Maximum accepted upload size.
    max_upload_size_bytes: u64,
}

impl LifecycleService {
    /// Creates a new lifecycle service.
    pub fn new(
        files: Arc<dyn FileStore>,
        chain: VersionChain,
        ledger: QuotaLedger,
        blobs: Arc<dyn BlobStore>,
        config: &StorageConfig,
    ) -> Self {
        Self {
            files,
            chain,
            ledger,
            blobs,
            tokens: ShareTokenGenerator::new(),
            max_upload_size_bytes: config.max_upload_size_bytes,
        }
    }

    /// Uploads file content for a user.
    ///
    /// If the owner already has a non-trashed file with the same name and
    /// versioning enabled, the content becomes a new version of that
    /// file; otherwise a new file is created. The blob is written before
    /// any metadata so a storage failure commits nothing.
    pub async fn upload(&self, owner_id: Uuid, params: UploadParams) -> AppResult<File> {
        if params.file_name.trim().is_empty() {
            return Err(AppError::validation("File name cannot be empty"));
        }
        if params.data.is_empty() {
            return Err(AppError::validation("Uploaded file is empty"));
        }
        if params.data.len() as u64 > self.max_upload_size_bytes {
            return Err(AppError::validation(format!(
                "File exceeds maximum upload size of {} bytes",
                self.max_upload_size_bytes
            )));
        }

        let size_bytes = params.data.len() as i64;
        let mime_type = params
            .mime_type
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let storage_key = blob_key(owner_id, &params.file_name);

        let existing = self
            .files
            .find_active_by_owner_and_name(owner_id, &params.file_name)
            .await?;

        match existing {
            Some(mut file) if file.versioning_enabled => {
                self.blobs.write(&storage_key, params.data).await?;
                let version = self
                    .chain
                    .append(&mut file, &storage_key, size_bytes, &mime_type)
                    .await?;
                self.ledger.reserve(owner_id, version.size_bytes).await?;

                info!(
                    owner_id = %owner_id,
                    file_id = %file.id,
                    version = version.version_number,
                    bytes = size_bytes,
                    "File uploaded as new version"
                );
                Ok(file)
            }
            _ => {
                self.blobs.write(&storage_key, params.data).await?;

                let file = File::create(CreateFile {
                    owner_id,
                    original_name: params.file_name,
                    storage_key,
                    size_bytes,
                    mime_type,
                    versioning_enabled: true,
                });
                self.files.insert(&file).await?;
                self.chain.create_initial(&file).await?;
                self.ledger.reserve(owner_id, size_bytes).await?;

                info!(
                    owner_id = %owner_id,
                    file_id = %file.id,
                    bytes = size_bytes,
                    "File uploaded"
                );
                Ok(file)
            }
        }
    }

    /// Reads the current content of an active file.
    pub async fn download(&self, file_id: Uuid, owner_id: Uuid) -> AppResult<(File, Bytes)> {
        let file = self.load_active(file_id, owner_id).await?;
        let data = self.blobs.read(&file.storage_key).await?;
        Ok((file, data))
    }

    /// Lists an owner's files; `trashed` selects the trash view.
    pub async fn list(&self, owner_id: Uuid, trashed: bool) -> AppResult<Vec<File>> {
        self.files.list_by_owner(owner_id, trashed).await
    }

    /// Moves an active file to the trash, releasing the current
    /// version's bytes from the owner's quota.
    ///
    /// The state flip is a single conditional store update; of two
    /// racing requests only the one that wins the flip releases quota.
    pub async fn trash(&self, file_id: Uuid, owner_id: Uuid) -> AppResult<File> {
        self.load_owned(file_id, owner_id).await?;

        let file = self
            .files
            .set_trashed(file_id, true)
            .await?
            .ok_or_else(|| AppError::invalid_operation("File is already in the trash"))?;
        self.ledger.release(owner_id, file.size_bytes).await?;

        info!(owner_id = %owner_id, file_id = %file_id, "File trashed");
        Ok(file)
    }

    /// Brings a trashed file back, re-reserving the current version's
    /// bytes. Conditional like `trash`: only the winning flip reserves.
    pub async fn restore(&self, file_id: Uuid, owner_id: Uuid) -> AppResult<File> {
        self.load_owned(file_id, owner_id).await?;

        let file = self
            .files
            .set_trashed(file_id, false)
            .await?
            .ok_or_else(|| AppError::invalid_operation("File is not in the trash"))?;
        self.ledger.reserve(owner_id, file.size_bytes).await?;

        info!(owner_id = %owner_id, file_id = %file_id, "File restored from trash");
        Ok(file)
    }

    /// Irreversibly deletes a trashed file: all version blobs, all
    /// version records, and the file record itself.
    ///
    /// Blobs are deleted before any metadata, so a purge that fails
    /// midway can be retried. Quota for historical versions (the current
    /// version was already released by `trash`) is released last.
    pub async fn purge(&self, file_id: Uuid, owner_id: Uuid) -> AppResult<()> {
        let file = self.load_owned(file_id, owner_id).await?;
        if !file.is_trashed() {
            return Err(AppError::invalid_operation(
                "Only trashed files can be permanently deleted",
            ));
        }

        let versions = self.chain.list(file.id).await?;
        for version in &versions {
            self.blobs.delete(&version.storage_key).await?;
        }

        let historical_bytes: i64 = versions
            .iter()
            .filter(|v| !v.is_current)
            .map(|v| v.size_bytes)
            .sum();

        self.chain.purge_versions(file.id).await?;
        self.files.delete(file.id).await?;
        self.ledger.release(owner_id, historical_bytes).await?;

        info!(
            owner_id = %owner_id,
            file_id = %file_id,
            versions = versions.len(),
            "File permanently deleted"
        );
        Ok(())
    }

    /// Toggles public visibility. Enabling generates a unique share
    /// token when the file has none; disabling clears it.
    pub async fn set_visibility(
        &self,
        file_id: Uuid,
        owner_id: Uuid,
        is_public: bool,
    ) -> AppResult<File> {
        let mut file = self.load_active(file_id, owner_id).await?;

        if !is_public {
            file.is_public = false;
            file.share_token = None;
            file.updated_at = chrono::Utc::now();
            self.files.update(&file).await?;
            info!(owner_id = %owner_id, file_id = %file_id, "File sharing revoked");
            return Ok(file);
        }

        file.is_public = true;
        file.updated_at = chrono::Utc::now();
        if file.share_token.is_some() {
            self.files.update(&file).await?;
            return Ok(file);
        }

        // The token is random; retry on the store's unique constraint.
        let mut last_err = None;
        for _ in 0..SHARE_TOKEN_ATTEMPTS {
            file.share_token = Some(self.tokens.generate());
            match self.files.update(&file).await {
                Ok(()) => {
                    info!(owner_id = %owner_id, file_id = %file_id, "File shared publicly");
                    return Ok(file);
                }
                Err(e) if e.kind == ErrorKind::Conflict => {
                    last_err = Some(e);
                }
                Err(e) => return Err(e),
            }
        }
        Err(last_err.unwrap_or_else(|| {
            AppError::internal("Failed to generate a unique share token")
        }))
    }

    /// Looks up a publicly shared file by its token.
    pub async fn shared(&self, token: &str) -> AppResult<File> {
        let file = self
            .files
            .find_by_share_token(token)
            .await?
            .filter(|f| f.is_public && !f.is_trashed())
            .ok_or_else(|| AppError::not_found("File not found or access denied"))?;
        Ok(file)
    }

    /// Reads the content of a publicly shared file by its token.
    pub async fn shared_download(&self, token: &str) -> AppResult<(File, Bytes)> {
        let file = self.shared(token).await?;
        let data = self.blobs.read(&file.storage_key).await?;
        Ok((file, data))
    }

    /// Enables or disables versioning for an active file.
    ///
    /// With versioning off, re-uploading the same name creates a second
    /// independent file instead of appending a version. Already-retained
    /// versions are kept.
    pub async fn set_versioning(
        &self,
        file_id: Uuid,
        owner_id: Uuid,
        enabled: bool,
    ) -> AppResult<File> {
        let mut file = self.load_active(file_id, owner_id).await?;
        if file.versioning_enabled != enabled {
            file.versioning_enabled = enabled;
            file.updated_at = chrono::Utc::now();
            self.files.update(&file).await?;
            info!(owner_id = %owner_id, file_id = %file_id, enabled, "File versioning toggled");
        }
        Ok(file)
    }

    /// Lists the versions of an active file, newest first.
    pub async fn list_versions(
        &self,
        file_id: Uuid,
        owner_id: Uuid,
    ) -> AppResult<Vec<FileVersion>> {
        let file = self.load_active(file_id, owner_id).await?;
        self.chain.list(file.id).await
    }

    /// Reads the content of a specific version of an active file.
    pub async fn download_version(
        &self,
        file_id: Uuid,
        owner_id: Uuid,
        version_number: i32,
    ) -> AppResult<(File, FileVersion, Bytes)> {
        let file = self.load_active(file_id, owner_id).await?;
        let version = self
            .chain
            .find(file.id, version_number)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Version {version_number} not found"))
            })?;
        let data = self.blobs.read(&version.storage_key).await?;
        Ok((file, version, data))
    }

    /// Makes an older version of an active file current again.
    ///
    /// Storage usage is unchanged: every retained version is already
    /// charged to the owner.
    pub async fn restore_version(
        &self,
        file_id: Uuid,
        owner_id: Uuid,
        version_number: i32,
    ) -> AppResult<File> {
        let mut file = self.load_active(file_id, owner_id).await?;
        self.chain.restore(&mut file, version_number).await?;
        Ok(file)
    }

    /// Deletes a historical version of an active file, releasing its
    /// bytes from the owner's quota.
    pub async fn delete_version(
        &self,
        file_id: Uuid,
        owner_id: Uuid,
        version_number: i32,
    ) -> AppResult<File> {
        let mut file = self.load_active(file_id, owner_id).await?;
        let removed = self.chain.delete_version(&mut file, version_number).await?;

        // Best-effort blob cleanup; an orphaned blob is preferable to
        // charging the user for a version record that no longer exists.
        if let Err(e) = self.blobs.delete(&removed.storage_key).await {
            warn!(
                file_id = %file_id,
                version = version_number,
                error = %e,
                "Failed to delete version blob"
            );
        }
        self.ledger.release(owner_id, removed.size_bytes).await?;

        Ok(file)
    }

    /// Returns the owner's quota usage snapshot.
    pub async fn quota(&self, owner_id: Uuid) -> AppResult<QuotaSnapshot> {
        self.ledger.snapshot(owner_id).await
    }

    /// Loads a file and verifies ownership. Foreign files are reported
    /// as not found rather than forbidden so ids cannot be probed.
    async fn load_owned(&self, file_id: Uuid, owner_id: Uuid) -> AppResult<File> {
        let file = self
            .files
            .find_by_id(file_id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))?;
        if file.owner_id != owner_id {
            return Err(AppError::not_found("File not found"));
        }
        Ok(file)
    }

    /// Loads an owned file and rejects trashed ones.
    async fn load_active(&self, file_id: Uuid, owner_id: Uuid) -> AppResult<File> {
        let file = self.load_owned(file_id, owner_id).await?;
        if file.is_trashed() {
            return Err(AppError::invalid_operation("File is in the trash"));
        }
        Ok(file)
    }
}

/// Builds a blob key: scoped to the owner, unique per upload.
fn blob_key(owner_id: Uuid, file_name: &str) -> String {
    format!("{owner_id}/{}-{file_name}", Uuid::new_v4())
}
