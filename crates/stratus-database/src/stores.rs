//! Store traits — the persistence boundary the engine is written against.
//!
//! The backing store must provide document-level atomic updates
//! (a single conditional read-modify-write per entity) and a unique
//! constraint on share tokens. No multi-document transaction is assumed.

use async_trait::async_trait;
use uuid::Uuid;

use stratus_core::result::AppResult;
use stratus_entity::file::{File, FileVersion};
use stratus_entity::user::{QuotaAccount, QuotaAdjustment};

/// Persistence operations for [`File`] records.
#[async_trait]
pub trait FileStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find a file by ID.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<File>>;

    /// Find a non-trashed file by owner and original name.
    async fn find_active_by_owner_and_name(
        &self,
        owner_id: Uuid,
        name: &str,
    ) -> AppResult<Option<File>>;

    /// Find a file by its share token.
    async fn find_by_share_token(&self, token: &str) -> AppResult<Option<File>>;

    /// List an owner's files; `trashed` selects the trash view.
    async fn list_by_owner(&self, owner_id: Uuid, trashed: bool) -> AppResult<Vec<File>>;

    /// Insert a new file record.
    ///
    /// A duplicate share token surfaces as `ErrorKind::Conflict`.
    async fn insert(&self, file: &File) -> AppResult<()>;

    /// Replace an existing file record.
    ///
    /// A duplicate share token surfaces as `ErrorKind::Conflict`.
    async fn update(&self, file: &File) -> AppResult<()>;

    /// Flip `is_deleted` as a single conditional read-modify-write.
    ///
    /// The flip only happens when the record is currently in the
    /// opposite state; `None` means no row changed (already in the
    /// requested state, or gone). Of two racing callers, exactly one
    /// sees the updated record, so quota changes keyed off the flip are
    /// applied once.
    async fn set_trashed(&self, id: Uuid, trashed: bool) -> AppResult<Option<File>>;

    /// Delete a file record. Returns `true` if a record was removed.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

/// Persistence operations for [`FileVersion`] records.
#[async_trait]
pub trait VersionStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a new version record.
    async fn insert(&self, version: &FileVersion) -> AppResult<()>;

    /// Find a specific version of a file.
    async fn find(&self, file_id: Uuid, version_number: i32) -> AppResult<Option<FileVersion>>;

    /// List all versions of a file, newest first.
    async fn list_for_file(&self, file_id: Uuid) -> AppResult<Vec<FileVersion>>;

    /// Unset `is_current` on every version of a file.
    ///
    /// Issued as one atomic update scoped to `file_id`; a concurrent
    /// reader may observe zero current versions but never two.
    async fn clear_current(&self, file_id: Uuid) -> AppResult<()>;

    /// Set `is_current` on one version of a file.
    async fn set_current(&self, file_id: Uuid, version_number: i32) -> AppResult<()>;

    /// Delete one version of a file. Returns `true` if a record was removed.
    async fn delete(&self, file_id: Uuid, version_number: i32) -> AppResult<bool>;

    /// Delete all versions of a file. Returns the number removed.
    async fn delete_all_for_file(&self, file_id: Uuid) -> AppResult<u64>;
}

/// Persistence operations for per-user quota counters.
#[async_trait]
pub trait QuotaStore: Send + Sync + std::fmt::Debug + 'static {
    /// Fetch a user's quota account, if one exists.
    async fn account(&self, user_id: Uuid) -> AppResult<Option<QuotaAccount>>;

    /// Apply a relative delta to a user's `storage_used` counter,
    /// clamped at a floor of zero.
    ///
    /// The account is created with `default_limit` if it does not exist.
    /// Implementations must express the delta as a single atomic
    /// read-modify-write so that concurrent callers compose by
    /// commutative addition.
    async fn adjust_usage(
        &self,
        user_id: Uuid,
        delta: i64,
        default_limit: i64,
    ) -> AppResult<QuotaAdjustment>;
}
