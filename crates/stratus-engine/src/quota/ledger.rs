//! The quota ledger — single source of truth for per-user storage usage.

use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use stratus_core::config::quota::QuotaConfig;
use stratus_core::result::AppResult;
use stratus_database::stores::QuotaStore;
use stratus_entity::user::{QuotaAccount, QuotaSnapshot};

/// Maintains the running total of bytes each user has stored.
///
/// All mutations are relative deltas so concurrent operations compose by
/// commutative addition; no other component may write `storage_used`.
/// Quotas are advisory — `reserve` never rejects for exceeding the limit.
#[derive(Debug, Clone)]
pub struct QuotaLedger {
    /// Quota store.
    store: Arc<dyn QuotaStore>,
    /// Limit applied when a user's account is first touched.
    default_limit_bytes: i64,
}

impl QuotaLedger {
    /// Creates a new quota ledger.
    pub fn new(store: Arc<dyn QuotaStore>, config: &QuotaConfig) -> Self {
        Self {
            store,
            default_limit_bytes: config.default_limit_bytes,
        }
    }

    /// Charges `bytes` to the user's storage usage.
    pub async fn reserve(&self, user_id: Uuid, bytes: i64) -> AppResult<()> {
        self.store
            .adjust_usage(user_id, bytes, self.default_limit_bytes)
            .await?;
        Ok(())
    }

    /// Releases `bytes` from the user's storage usage, clamped at zero.
    ///
    /// A clamp means the bookkeeping had drifted; it is logged as a
    /// consistency warning and never surfaced to the caller.
    pub async fn release(&self, user_id: Uuid, bytes: i64) -> AppResult<()> {
        let delta = -bytes;
        let adjustment = self
            .store
            .adjust_usage(user_id, delta, self.default_limit_bytes)
            .await?;

        if adjustment.clamped_for(delta) {
            warn!(
                %user_id,
                previous = adjustment.previous,
                released = bytes,
                "Storage usage clamped to zero; quota bookkeeping had drifted"
            );
        }
        Ok(())
    }

    /// Returns the user's current usage, limit, and rounded percentage.
    pub async fn snapshot(&self, user_id: Uuid) -> AppResult<QuotaSnapshot> {
        let account = self
            .store
            .account(user_id)
            .await?
            .unwrap_or(QuotaAccount {
                user_id,
                storage_used: 0,
                storage_limit: self.default_limit_bytes,
            });
        Ok(QuotaSnapshot::from_account(&account))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratus_database::memory::MemoryStore;

    fn ledger() -> QuotaLedger {
        QuotaLedger::new(
            Arc::new(MemoryStore::new()),
            &QuotaConfig {
                default_limit_bytes: 1000,
            },
        )
    }

    #[tokio::test]
    async fn test_reserve_release_round_trip() {
        let ledger = ledger();
        let user = Uuid::new_v4();

        ledger.reserve(user, 400).await.unwrap();
        ledger.release(user, 150).await.unwrap();

        let snapshot = ledger.snapshot(user).await.unwrap();
        assert_eq!(snapshot.used, 250);
        assert_eq!(snapshot.limit, 1000);
        assert_eq!(snapshot.percentage, 25);
    }

    #[tokio::test]
    async fn test_release_never_goes_negative() {
        let ledger = ledger();
        let user = Uuid::new_v4();

        ledger.reserve(user, 100).await.unwrap();
        ledger.release(user, 500).await.unwrap();

        let snapshot = ledger.snapshot(user).await.unwrap();
        assert_eq!(snapshot.used, 0);
    }

    #[tokio::test]
    async fn test_snapshot_for_untouched_user() {
        let ledger = ledger();
        let snapshot = ledger.snapshot(Uuid::new_v4()).await.unwrap();
        assert_eq!(snapshot.used, 0);
        assert_eq!(snapshot.limit, 1000);
        assert_eq!(snapshot.percentage, 0);
    }

    #[tokio::test]
    async fn test_soft_quota_allows_overage() {
        let ledger = ledger();
        let user = Uuid::new_v4();

        ledger.reserve(user, 1500).await.unwrap();

        let snapshot = ledger.snapshot(user).await.unwrap();
        assert_eq!(snapshot.used, 1500);
        assert_eq!(snapshot.percentage, 150);
    }
}
