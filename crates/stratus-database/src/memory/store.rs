//! In-memory store using dashmap.
//!
//! Implements all three store traits over concurrent hash maps. Version
//! records are grouped per file so that flips of the `is_current` flag
//! happen under the file's map entry, matching the document-level
//! atomicity the engine relies on.

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use stratus_core::error::AppError;
use stratus_core::result::AppResult;
use stratus_entity::file::{File, FileVersion};
use stratus_entity::user::{QuotaAccount, QuotaAdjustment};

use crate::stores::{FileStore, QuotaStore, VersionStore};

/// In-memory implementation of the Stratus store traits.
///
/// Used by the engine test suite and by embedded deployments that do not
/// need durability.
#[derive(Debug, Default)]
pub struct MemoryStore {
    files: DashMap<Uuid, File>,
    versions: DashMap<Uuid, Vec<FileVersion>>,
    accounts: DashMap<Uuid, QuotaAccount>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn share_token_taken(&self, token: &str, except_file: Uuid) -> bool {
        self.files.iter().any(|entry| {
            entry.key() != &except_file && entry.value().share_token.as_deref() == Some(token)
        })
    }
}

#[async_trait]
impl FileStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<File>> {
        Ok(self.files.get(&id).map(|f| f.clone()))
    }

    async fn find_active_by_owner_and_name(
        &self,
        owner_id: Uuid,
        name: &str,
    ) -> AppResult<Option<File>> {
        let mut candidates: Vec<File> = self
            .files
            .iter()
            .filter(|entry| {
                let f = entry.value();
                f.owner_id == owner_id && f.original_name == name && !f.is_deleted
            })
            .map(|entry| entry.value().clone())
            .collect();
        candidates.sort_by_key(|f| std::cmp::Reverse(f.created_at));
        Ok(candidates.into_iter().next())
    }

    async fn find_by_share_token(&self, token: &str) -> AppResult<Option<File>> {
        Ok(self
            .files
            .iter()
            .find(|entry| entry.value().share_token.as_deref() == Some(token))
            .map(|entry| entry.value().clone()))
    }

    async fn list_by_owner(&self, owner_id: Uuid, trashed: bool) -> AppResult<Vec<File>> {
        let mut files: Vec<File> = self
            .files
            .iter()
            .filter(|entry| {
                let f = entry.value();
                f.owner_id == owner_id && f.is_deleted == trashed
            })
            .map(|entry| entry.value().clone())
            .collect();
        files.sort_by_key(|f| std::cmp::Reverse(f.updated_at));
        Ok(files)
    }

    async fn insert(&self, file: &File) -> AppResult<()> {
        if let Some(token) = file.share_token.as_deref() {
            if self.share_token_taken(token, file.id) {
                return Err(AppError::conflict("Share token already in use"));
            }
        }
        self.files.insert(file.id, file.clone());
        Ok(())
    }

    async fn update(&self, file: &File) -> AppResult<()> {
        if let Some(token) = file.share_token.as_deref() {
            if self.share_token_taken(token, file.id) {
                return Err(AppError::conflict("Share token already in use"));
            }
        }
        match self.files.get_mut(&file.id) {
            Some(mut entry) => {
                *entry = file.clone();
                Ok(())
            }
            None => Err(AppError::not_found(format!("File {} not found", file.id))),
        }
    }

    async fn set_trashed(&self, id: Uuid, trashed: bool) -> AppResult<Option<File>> {
        // Checked and flipped under the map entry's lock, so only one of
        // two racing callers observes the transition.
        match self.files.get_mut(&id) {
            Some(mut entry) if entry.is_deleted != trashed => {
                if trashed {
                    entry.mark_trashed();
                } else {
                    entry.mark_restored();
                }
                Ok(Some(entry.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.files.remove(&id).is_some())
    }
}

#[async_trait]
impl VersionStore for MemoryStore {
    async fn insert(&self, version: &FileVersion) -> AppResult<()> {
        self.versions
            .entry(version.file_id)
            .or_default()
            .push(version.clone());
        Ok(())
    }

    async fn find(&self, file_id: Uuid, version_number: i32) -> AppResult<Option<FileVersion>> {
        Ok(self.versions.get(&file_id).and_then(|versions| {
            versions
                .iter()
                .find(|v| v.version_number == version_number)
                .cloned()
        }))
    }

    async fn list_for_file(&self, file_id: Uuid) -> AppResult<Vec<FileVersion>> {
        let mut versions = self
            .versions
            .get(&file_id)
            .map(|v| v.clone())
            .unwrap_or_default();
        versions.sort_by_key(|v| std::cmp::Reverse(v.version_number));
        Ok(versions)
    }

    async fn clear_current(&self, file_id: Uuid) -> AppResult<()> {
        if let Some(mut versions) = self.versions.get_mut(&file_id) {
            for v in versions.iter_mut() {
                v.is_current = false;
            }
        }
        Ok(())
    }

    async fn set_current(&self, file_id: Uuid, version_number: i32) -> AppResult<()> {
        if let Some(mut versions) = self.versions.get_mut(&file_id) {
            for v in versions.iter_mut() {
                if v.version_number == version_number {
                    v.is_current = true;
                }
            }
        }
        Ok(())
    }

    async fn delete(&self, file_id: Uuid, version_number: i32) -> AppResult<bool> {
        match self.versions.get_mut(&file_id) {
            Some(mut versions) => {
                let before = versions.len();
                versions.retain(|v| v.version_number != version_number);
                Ok(versions.len() < before)
            }
            None => Ok(false),
        }
    }

    async fn delete_all_for_file(&self, file_id: Uuid) -> AppResult<u64> {
        Ok(self
            .versions
            .remove(&file_id)
            .map(|(_, versions)| versions.len() as u64)
            .unwrap_or(0))
    }
}

#[async_trait]
impl QuotaStore for MemoryStore {
    async fn account(&self, user_id: Uuid) -> AppResult<Option<QuotaAccount>> {
        Ok(self.accounts.get(&user_id).map(|a| a.clone()))
    }

    async fn adjust_usage(
        &self,
        user_id: Uuid,
        delta: i64,
        default_limit: i64,
    ) -> AppResult<QuotaAdjustment> {
        let mut entry = self.accounts.entry(user_id).or_insert_with(|| QuotaAccount {
            user_id,
            storage_used: 0,
            storage_limit: default_limit,
        });
        let previous = entry.storage_used;
        entry.storage_used = previous.saturating_add(delta).max(0);
        Ok(QuotaAdjustment {
            previous,
            current: entry.storage_used,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratus_entity::file::CreateFile;

    fn sample_file(owner_id: Uuid, name: &str) -> File {
        File::create(CreateFile {
            owner_id,
            original_name: name.to_string(),
            storage_key: format!("{owner_id}/{name}"),
            size_bytes: 10,
            mime_type: "text/plain".to_string(),
            versioning_enabled: true,
        })
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_share_token() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();

        let mut a = sample_file(owner, "a.txt");
        a.share_token = Some("tok".to_string());
        FileStore::insert(&store, &a).await.unwrap();

        let mut b = sample_file(owner, "b.txt");
        b.share_token = Some("tok".to_string());
        let err = FileStore::insert(&store, &b).await.unwrap_err();
        assert_eq!(err.kind, stratus_core::error::ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_set_trashed_flips_exactly_once() {
        let store = MemoryStore::new();
        let file = sample_file(Uuid::new_v4(), "a.txt");
        FileStore::insert(&store, &file).await.unwrap();

        let first = store.set_trashed(file.id, true).await.unwrap();
        assert!(first.is_some_and(|f| f.is_deleted && f.deleted_at.is_some()));

        // A second attempt at the same transition is a no-op.
        assert!(store.set_trashed(file.id, true).await.unwrap().is_none());

        let back = store.set_trashed(file.id, false).await.unwrap();
        assert!(back.is_some_and(|f| !f.is_deleted && f.deleted_at.is_none()));
        assert!(store.set_trashed(file.id, false).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_adjust_usage_clamps_at_zero() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();

        let adj = store.adjust_usage(user, 100, 1000).await.unwrap();
        assert_eq!(adj.current, 100);

        let adj = store.adjust_usage(user, -250, 1000).await.unwrap();
        assert_eq!(adj.previous, 100);
        assert_eq!(adj.current, 0);
    }

    #[tokio::test]
    async fn test_clear_and_set_current() {
        let store = MemoryStore::new();
        let file_id = Uuid::new_v4();

        let v1 = FileVersion::new(file_id, 1, "k1", 10, "text/plain", true);
        let v2 = FileVersion::new(file_id, 2, "k2", 20, "text/plain", false);
        VersionStore::insert(&store, &v1).await.unwrap();
        VersionStore::insert(&store, &v2).await.unwrap();

        store.clear_current(file_id).await.unwrap();
        store.set_current(file_id, 2).await.unwrap();

        let versions = store.list_for_file(file_id).await.unwrap();
        let current: Vec<i32> = versions
            .iter()
            .filter(|v| v.is_current)
            .map(|v| v.version_number)
            .collect();
        assert_eq!(current, vec![2]);
    }
}
