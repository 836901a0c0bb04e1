//! File store backed by PostgreSQL.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use stratus_core::result::AppResult;
use stratus_entity::file::File;

use crate::repositories::map_db_err;
use crate::stores::FileStore;

/// PostgreSQL implementation of [`FileStore`].
#[derive(Debug, Clone)]
pub struct PgFileStore {
    pool: PgPool,
}

impl PgFileStore {
    /// Create a new file store over the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileStore for PgFileStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>("SELECT * FROM files WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_err("Failed to find file", e))
    }

    async fn find_active_by_owner_and_name(
        &self,
        owner_id: Uuid,
        name: &str,
    ) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>(
            "SELECT * FROM files \
             WHERE owner_id = $1 AND original_name = $2 AND NOT is_deleted \
             ORDER BY created_at DESC LIMIT 1",
        )
        .bind(owner_id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_err("Failed to find file by name", e))
    }

    async fn find_by_share_token(&self, token: &str) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>("SELECT * FROM files WHERE share_token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_err("Failed to find file by share token", e))
    }

    async fn list_by_owner(&self, owner_id: Uuid, trashed: bool) -> AppResult<Vec<File>> {
        sqlx::query_as::<_, File>(
            "SELECT * FROM files WHERE owner_id = $1 AND is_deleted = $2 \
             ORDER BY updated_at DESC",
        )
        .bind(owner_id)
        .bind(trashed)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_err("Failed to list files", e))
    }

    async fn insert(&self, file: &File) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO files (id, owner_id, original_name, storage_key, size_bytes, \
             mime_type, is_public, share_token, is_deleted, deleted_at, current_version, \
             total_versions, versioning_enabled, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)",
        )
        .bind(file.id)
        .bind(file.owner_id)
        .bind(&file.original_name)
        .bind(&file.storage_key)
        .bind(file.size_bytes)
        .bind(&file.mime_type)
        .bind(file.is_public)
        .bind(&file.share_token)
        .bind(file.is_deleted)
        .bind(file.deleted_at)
        .bind(file.current_version)
        .bind(file.total_versions)
        .bind(file.versioning_enabled)
        .bind(file.created_at)
        .bind(file.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_err("Failed to insert file", e))?;
        Ok(())
    }

    async fn update(&self, file: &File) -> AppResult<()> {
        sqlx::query(
            "UPDATE files SET original_name = $2, storage_key = $3, size_bytes = $4, \
             mime_type = $5, is_public = $6, share_token = $7, is_deleted = $8, \
             deleted_at = $9, current_version = $10, total_versions = $11, \
             versioning_enabled = $12, updated_at = $13 \
             WHERE id = $1",
        )
        .bind(file.id)
        .bind(&file.original_name)
        .bind(&file.storage_key)
        .bind(file.size_bytes)
        .bind(&file.mime_type)
        .bind(file.is_public)
        .bind(&file.share_token)
        .bind(file.is_deleted)
        .bind(file.deleted_at)
        .bind(file.current_version)
        .bind(file.total_versions)
        .bind(file.versioning_enabled)
        .bind(file.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_err("Failed to update file", e))?;
        Ok(())
    }

    async fn set_trashed(&self, id: Uuid, trashed: bool) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>(
            "UPDATE files SET is_deleted = $2, \
             deleted_at = CASE WHEN $2 THEN NOW() ELSE NULL END, \
             updated_at = NOW() \
             WHERE id = $1 AND is_deleted <> $2 \
             RETURNING *",
        )
        .bind(id)
        .bind(trashed)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_err("Failed to update trash state", e))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_err("Failed to delete file", e))?;
        Ok(result.rows_affected() > 0)
    }
}
