//! The bulk operation coordinator.
//!
//! Fans one request out into per-item lifecycle calls. Batches are
//! best-effort: each item runs inside its own failure boundary, and one
//! stale id never rolls back or aborts the work done on valid items.

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use stratus_core::error::{AppError, ErrorKind};
use stratus_core::result::AppResult;

use crate::file::lifecycle::LifecycleService;

/// Maximum number of file ids accepted in one bulk request.
pub const MAX_BULK_ITEMS: usize = 100;

/// A lifecycle action applied to every item of a bulk request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BulkAction {
    /// Move each file to the trash.
    Delete,
    /// Bring each file back from the trash.
    Restore,
    /// Purge each file.
    PermanentDelete,
    /// Make each file public.
    Share,
    /// Make each file private.
    Unshare,
}

/// A single item's failure within a bulk request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkItemError {
    /// The file id the failure applies to.
    pub file_id: Uuid,
    /// The error category.
    pub kind: ErrorKind,
    /// Human-readable message.
    pub message: String,
}

/// Aggregated result of a bulk request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkOutcome {
    /// Number of ids in the request.
    pub requested_count: usize,
    /// Number of items that succeeded.
    pub succeeded_count: usize,
    /// Per-item failures, keyed by file id.
    pub errors: Vec<BulkItemError>,
}

/// Applies one lifecycle action to a batch of files.
#[derive(Debug, Clone)]
pub struct BulkCoordinator {
    /// Lifecycle service performing the per-item work.
    lifecycle: LifecycleService,
}

impl BulkCoordinator {
    /// Creates a new bulk coordinator.
    pub fn new(lifecycle: LifecycleService) -> Self {
        Self { lifecycle }
    }

    /// Runs `action` against every id in `file_ids`.
    ///
    /// The batch size is validated up front: an empty batch or one over
    /// [`MAX_BULK_ITEMS`] is rejected wholesale before any item runs.
    pub async fn run(
        &self,
        owner_id: Uuid,
        action: BulkAction,
        file_ids: &[Uuid],
    ) -> AppResult<BulkOutcome> {
        if file_ids.is_empty() {
            return Err(AppError::validation(
                "Bulk request must include at least one file id",
            ));
        }
        if file_ids.len() > MAX_BULK_ITEMS {
            return Err(AppError::validation(format!(
                "Bulk request exceeds the limit of {MAX_BULK_ITEMS} file ids"
            )));
        }

        let mut errors = Vec::new();
        let mut succeeded = 0usize;

        for &file_id in file_ids {
            let result = self.apply(owner_id, action, file_id).await;
            match result {
                Ok(()) => succeeded += 1,
                Err(e) => errors.push(BulkItemError {
                    file_id,
                    kind: e.kind,
                    message: e.message,
                }),
            }
        }

        info!(
            owner_id = %owner_id,
            action = ?action,
            requested = file_ids.len(),
            succeeded,
            failed = errors.len(),
            "Bulk operation completed"
        );

        Ok(BulkOutcome {
            requested_count: file_ids.len(),
            succeeded_count: succeeded,
            errors,
        })
    }

    async fn apply(&self, owner_id: Uuid, action: BulkAction, file_id: Uuid) -> AppResult<()> {
        match action {
            BulkAction::Delete => {
                self.lifecycle.trash(file_id, owner_id).await?;
            }
            BulkAction::Restore => {
                self.lifecycle.restore(file_id, owner_id).await?;
            }
            BulkAction::PermanentDelete => {
                self.lifecycle.purge(file_id, owner_id).await?;
            }
            BulkAction::Share => {
                self.lifecycle.set_visibility(file_id, owner_id, true).await?;
            }
            BulkAction::Unshare => {
                self.lifecycle
                    .set_visibility(file_id, owner_id, false)
                    .await?;
            }
        }
        Ok(())
    }
}
