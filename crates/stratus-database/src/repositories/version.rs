//! File version store backed by PostgreSQL.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use stratus_core::result::AppResult;
use stratus_entity::file::FileVersion;

use crate::repositories::map_db_err;
use crate::stores::VersionStore;

/// PostgreSQL implementation of [`VersionStore`].
#[derive(Debug, Clone)]
pub struct PgVersionStore {
    pool: PgPool,
}

impl PgVersionStore {
    /// Create a new version store over the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VersionStore for PgVersionStore {
    async fn insert(&self, version: &FileVersion) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO file_versions (id, file_id, version_number, storage_key, \
             size_bytes, mime_type, is_current, uploaded_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(version.id)
        .bind(version.file_id)
        .bind(version.version_number)
        .bind(&version.storage_key)
        .bind(version.size_bytes)
        .bind(&version.mime_type)
        .bind(version.is_current)
        .bind(version.uploaded_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_err("Failed to insert version", e))?;
        Ok(())
    }

    async fn find(&self, file_id: Uuid, version_number: i32) -> AppResult<Option<FileVersion>> {
        sqlx::query_as::<_, FileVersion>(
            "SELECT * FROM file_versions WHERE file_id = $1 AND version_number = $2",
        )
        .bind(file_id)
        .bind(version_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_err("Failed to find version", e))
    }

    async fn list_for_file(&self, file_id: Uuid) -> AppResult<Vec<FileVersion>> {
        sqlx::query_as::<_, FileVersion>(
            "SELECT * FROM file_versions WHERE file_id = $1 ORDER BY version_number DESC",
        )
        .bind(file_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_err("Failed to list versions", e))
    }

    async fn clear_current(&self, file_id: Uuid) -> AppResult<()> {
        sqlx::query("UPDATE file_versions SET is_current = FALSE WHERE file_id = $1")
            .bind(file_id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_err("Failed to clear current version", e))?;
        Ok(())
    }

    async fn set_current(&self, file_id: Uuid, version_number: i32) -> AppResult<()> {
        sqlx::query(
            "UPDATE file_versions SET is_current = TRUE \
             WHERE file_id = $1 AND version_number = $2",
        )
        .bind(file_id)
        .bind(version_number)
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_err("Failed to set current version", e))?;
        Ok(())
    }

    async fn delete(&self, file_id: Uuid, version_number: i32) -> AppResult<bool> {
        let result = sqlx::query(
            "DELETE FROM file_versions WHERE file_id = $1 AND version_number = $2",
        )
        .bind(file_id)
        .bind(version_number)
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_err("Failed to delete version", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_all_for_file(&self, file_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM file_versions WHERE file_id = $1")
            .bind(file_id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_err("Failed to delete versions", e))?;
        Ok(result.rows_affected())
    }
}
