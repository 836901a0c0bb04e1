//! Blob store trait for pluggable byte-storage backends.

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Trait for blob storage backends.
///
/// Blobs are addressed by an opaque storage key chosen by the caller.
/// Implementations exist for the local filesystem and an in-memory store;
/// remote object stores plug in behind the same seam.
///
/// The trait is defined here in `stratus-core` and implemented in
/// `stratus-storage`.
#[async_trait]
pub trait BlobStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local", "memory").
    fn provider_type(&self) -> &str;

    /// Check whether the provider is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Write the blob stored under the given key.
    async fn write(&self, key: &str, data: Bytes) -> AppResult<()>;

    /// Read the blob stored under the given key into memory.
    async fn read(&self, key: &str) -> AppResult<Bytes>;

    /// Delete the blob stored under the given key.
    ///
    /// Deleting a key that does not exist is not an error; a retried
    /// purge must be able to pass over blobs it already removed.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Check whether a blob exists under the given key.
    async fn exists(&self, key: &str) -> AppResult<bool>;
}
