//! Per-user storage quota entities.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A user's storage accounting record.
///
/// `storage_used` is a derived aggregate: the sum of byte sizes of all
/// live versions across the user's non-purged files. It is only ever
/// mutated through relative deltas and never goes below zero.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuotaAccount {
    /// The user this account belongs to.
    pub user_id: Uuid,
    /// Bytes currently charged to the user.
    pub storage_used: i64,
    /// Advisory storage limit in bytes.
    pub storage_limit: i64,
}

/// Point-in-time quota usage reported to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotaSnapshot {
    /// Bytes currently charged.
    pub used: i64,
    /// Advisory limit in bytes.
    pub limit: i64,
    /// Rounded usage percentage.
    pub percentage: i64,
}

impl QuotaSnapshot {
    /// Build a snapshot from an account, computing the rounded percentage.
    pub fn from_account(account: &QuotaAccount) -> Self {
        let percentage = if account.storage_limit > 0 {
            ((account.storage_used as f64 / account.storage_limit as f64) * 100.0).round() as i64
        } else {
            0
        };
        Self {
            used: account.storage_used,
            limit: account.storage_limit,
            percentage,
        }
    }
}

/// Result of applying a relative delta to a quota counter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct QuotaAdjustment {
    /// Counter value before the delta.
    pub previous: i64,
    /// Counter value after the delta, clamped at zero.
    pub current: i64,
}

impl QuotaAdjustment {
    /// Whether applying `delta` hit the zero floor.
    pub fn clamped_for(&self, delta: i64) -> bool {
        self.previous.saturating_add(delta) != self.current
    }
}
