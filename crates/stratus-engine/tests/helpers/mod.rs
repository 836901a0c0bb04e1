//! Shared setup for engine integration tests: a full engine wired
//! against the in-memory store and blob store.

use std::sync::Arc;

use bytes::Bytes;
use uuid::Uuid;

use stratus_core::config::quota::QuotaConfig;
use stratus_core::config::storage::StorageConfig;
use stratus_database::memory::MemoryStore;
use stratus_engine::file::{BulkCoordinator, LifecycleService, UploadParams, VersionChain};
use stratus_engine::quota::QuotaLedger;
use stratus_entity::file::File;
use stratus_storage::MemoryBlobStore;

/// Per-user quota limit used across the scenario tests.
pub const TEST_LIMIT_BYTES: i64 = 1000;

/// A fully wired engine over in-memory backends.
pub struct TestEngine {
    pub lifecycle: LifecycleService,
    pub bulk: BulkCoordinator,
    pub blobs: Arc<MemoryBlobStore>,
}

/// Builds an engine with a 1000-byte default quota limit.
pub fn engine() -> TestEngine {
    let store = Arc::new(MemoryStore::new());
    let blobs = Arc::new(MemoryBlobStore::new());

    let chain = VersionChain::new(store.clone(), store.clone());
    let ledger = QuotaLedger::new(
        store.clone(),
        &QuotaConfig {
            default_limit_bytes: TEST_LIMIT_BYTES,
        },
    );
    let lifecycle = LifecycleService::new(
        store,
        chain,
        ledger,
        blobs.clone(),
        &StorageConfig::default(),
    );
    let bulk = BulkCoordinator::new(lifecycle.clone());

    TestEngine {
        lifecycle,
        bulk,
        blobs,
    }
}

/// Uploads `size` bytes under `name` for `owner`.
pub async fn upload(engine: &TestEngine, owner: Uuid, name: &str, size: usize) -> File {
    engine
        .lifecycle
        .upload(
            owner,
            UploadParams {
                file_name: name.to_string(),
                mime_type: Some("text/plain".to_string()),
                data: Bytes::from(vec![b'x'; size]),
            },
        )
        .await
        .expect("upload should succeed")
}
