//! In-memory blob store.

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;

use stratus_core::error::AppError;
use stratus_core::result::AppResult;
use stratus_core::traits::BlobStore;

/// In-memory blob store backed by a concurrent map.
///
/// Used by the engine test suite and by embedded deployments that do not
/// need durable blobs.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: DashMap<String, Bytes>,
}

impl MemoryBlobStore {
    /// Create an empty blob store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of blobs currently held.
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    /// Whether the store holds no blobs.
    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn write(&self, key: &str, data: Bytes) -> AppResult<()> {
        self.blobs.insert(key.to_string(), data);
        Ok(())
    }

    async fn read(&self, key: &str) -> AppResult<Bytes> {
        self.blobs
            .get(key)
            .map(|b| b.clone())
            .ok_or_else(|| AppError::not_found(format!("Blob not found: {key}")))
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.blobs.remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.blobs.contains_key(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_round_trip() {
        let store = MemoryBlobStore::new();
        store.write("key", Bytes::from("data")).await.unwrap();
        assert_eq!(store.read("key").await.unwrap(), Bytes::from("data"));

        store.delete("key").await.unwrap();
        assert!(!store.exists("key").await.unwrap());
        assert!(store.is_empty());
    }
}
