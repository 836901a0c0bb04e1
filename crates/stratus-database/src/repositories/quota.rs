//! Quota store backed by PostgreSQL.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use stratus_core::result::AppResult;
use stratus_entity::user::{QuotaAccount, QuotaAdjustment};

use crate::repositories::map_db_err;
use crate::stores::QuotaStore;

/// PostgreSQL implementation of [`QuotaStore`].
///
/// Usage deltas are applied with a single upsert statement so that
/// concurrent reserve/release calls compose without locking; the zero
/// floor is enforced in the same statement via `GREATEST`.
#[derive(Debug, Clone)]
pub struct PgQuotaStore {
    pool: PgPool,
}

impl PgQuotaStore {
    /// Create a new quota store over the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuotaStore for PgQuotaStore {
    async fn account(&self, user_id: Uuid) -> AppResult<Option<QuotaAccount>> {
        sqlx::query_as::<_, QuotaAccount>("SELECT * FROM quota_accounts WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_err("Failed to fetch quota account", e))
    }

    async fn adjust_usage(
        &self,
        user_id: Uuid,
        delta: i64,
        default_limit: i64,
    ) -> AppResult<QuotaAdjustment> {
        let (previous, current): (i64, i64) = sqlx::query_as(
            "WITH prior AS ( \
                 SELECT storage_used FROM quota_accounts WHERE user_id = $1 \
             ), updated AS ( \
                 INSERT INTO quota_accounts (user_id, storage_used, storage_limit) \
                 VALUES ($1, GREATEST($2, 0), $3) \
                 ON CONFLICT (user_id) DO UPDATE \
                     SET storage_used = GREATEST(quota_accounts.storage_used + $2, 0) \
                 RETURNING storage_used \
             ) \
             SELECT COALESCE((SELECT storage_used FROM prior), 0), \
                    (SELECT storage_used FROM updated)",
        )
        .bind(user_id)
        .bind(delta)
        .bind(default_limit)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_err("Failed to adjust storage usage", e))?;

        Ok(QuotaAdjustment { previous, current })
    }
}
