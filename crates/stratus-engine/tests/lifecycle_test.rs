//! End-to-end lifecycle scenarios: upload, versioning, trash, restore,
//! purge, sharing, and the quota accounting that ties them together.

mod helpers;

use uuid::Uuid;

use stratus_core::error::ErrorKind;

use helpers::{engine, upload};

#[tokio::test]
async fn test_upload_then_version_accumulates_quota() {
    let engine = engine();
    let owner = Uuid::new_v4();

    let file = upload(&engine, owner, "a.txt", 100).await;
    assert_eq!(file.current_version, 1);
    let snapshot = engine.lifecycle.quota(owner).await.unwrap();
    assert_eq!(snapshot.used, 100);

    // Same name, versioning enabled: becomes version 2 of the same file.
    let file = upload(&engine, owner, "a.txt", 50).await;
    assert_eq!(file.current_version, 2);
    assert_eq!(file.total_versions, 2);
    assert_eq!(file.size_bytes, 50);

    let snapshot = engine.lifecycle.quota(owner).await.unwrap();
    assert_eq!(snapshot.used, 150);
    assert_eq!(snapshot.percentage, 15);
}

#[tokio::test]
async fn test_trash_releases_current_purge_releases_history() {
    let engine = engine();
    let owner = Uuid::new_v4();

    upload(&engine, owner, "a.txt", 100).await;
    let file = upload(&engine, owner, "a.txt", 50).await;

    engine.lifecycle.trash(file.id, owner).await.unwrap();
    let snapshot = engine.lifecycle.quota(owner).await.unwrap();
    assert_eq!(snapshot.used, 100, "trash releases only the current 50 bytes");

    engine.lifecycle.purge(file.id, owner).await.unwrap();
    let snapshot = engine.lifecycle.quota(owner).await.unwrap();
    assert_eq!(snapshot.used, 0, "purge releases the historical 100 bytes");

    assert!(engine.blobs.is_empty(), "purge removes every version blob");
    assert!(
        engine
            .lifecycle
            .list(owner, true)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_trash_twice_fails_without_double_release() {
    let engine = engine();
    let owner = Uuid::new_v4();
    let file = upload(&engine, owner, "a.txt", 100).await;

    engine.lifecycle.trash(file.id, owner).await.unwrap();
    let err = engine.lifecycle.trash(file.id, owner).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidOperation);

    let snapshot = engine.lifecycle.quota(owner).await.unwrap();
    assert_eq!(snapshot.used, 0, "quota released exactly once");
}

#[tokio::test]
async fn test_restore_re_reserves_quota() {
    let engine = engine();
    let owner = Uuid::new_v4();
    let file = upload(&engine, owner, "a.txt", 100).await;

    engine.lifecycle.trash(file.id, owner).await.unwrap();
    engine.lifecycle.restore(file.id, owner).await.unwrap();

    let snapshot = engine.lifecycle.quota(owner).await.unwrap();
    assert_eq!(snapshot.used, 100);

    let err = engine.lifecycle.restore(file.id, owner).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidOperation);
    let snapshot = engine.lifecycle.quota(owner).await.unwrap();
    assert_eq!(snapshot.used, 100, "failed restore does not re-apply quota");
}

#[tokio::test]
async fn test_purge_requires_trash_first() {
    let engine = engine();
    let owner = Uuid::new_v4();
    let file = upload(&engine, owner, "a.txt", 100).await;

    let err = engine.lifecycle.purge(file.id, owner).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidOperation);
}

#[tokio::test]
async fn test_version_restore_round_trip() {
    let engine = engine();
    let owner = Uuid::new_v4();

    let original = upload(&engine, owner, "a.txt", 100).await;
    let appended = upload(&engine, owner, "a.txt", 50).await;
    assert_ne!(original.storage_key, appended.storage_key);

    let restored = engine
        .lifecycle
        .restore_version(appended.id, owner, 1)
        .await
        .unwrap();

    assert_eq!(restored.size_bytes, original.size_bytes);
    assert_eq!(restored.storage_key, original.storage_key);
    assert_eq!(restored.current_version, 1);
    assert_eq!(restored.total_versions, 2);

    // Quota is unchanged: both versions stay charged.
    let snapshot = engine.lifecycle.quota(owner).await.unwrap();
    assert_eq!(snapshot.used, 150);
}

#[tokio::test]
async fn test_delete_current_version_changes_nothing() {
    let engine = engine();
    let owner = Uuid::new_v4();

    upload(&engine, owner, "a.txt", 100).await;
    let file = upload(&engine, owner, "a.txt", 50).await;

    let err = engine
        .lifecycle
        .delete_version(file.id, owner, file.current_version)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidOperation);

    let versions = engine.lifecycle.list_versions(file.id, owner).await.unwrap();
    assert_eq!(versions.len(), 2);
    let snapshot = engine.lifecycle.quota(owner).await.unwrap();
    assert_eq!(snapshot.used, 150);
}

#[tokio::test]
async fn test_delete_historical_version_releases_quota() {
    let engine = engine();
    let owner = Uuid::new_v4();

    upload(&engine, owner, "a.txt", 100).await;
    let file = upload(&engine, owner, "a.txt", 50).await;

    let updated = engine
        .lifecycle
        .delete_version(file.id, owner, 1)
        .await
        .unwrap();
    assert_eq!(updated.total_versions, 1);

    let snapshot = engine.lifecycle.quota(owner).await.unwrap();
    assert_eq!(snapshot.used, 50);
}

#[tokio::test]
async fn test_exactly_one_current_version_after_interleaving() {
    let engine = engine();
    let owner = Uuid::new_v4();

    upload(&engine, owner, "a.txt", 10).await;
    upload(&engine, owner, "a.txt", 20).await;
    let file = upload(&engine, owner, "a.txt", 30).await;
    engine
        .lifecycle
        .restore_version(file.id, owner, 2)
        .await
        .unwrap();

    let versions = engine.lifecycle.list_versions(file.id, owner).await.unwrap();
    let current: Vec<i32> = versions
        .iter()
        .filter(|v| v.is_current)
        .map(|v| v.version_number)
        .collect();
    assert_eq!(current, vec![2]);

    let file = engine
        .lifecycle
        .list(owner, false)
        .await
        .unwrap()
        .into_iter()
        .next()
        .unwrap();
    assert_eq!(file.current_version, 2);
}

#[tokio::test]
async fn test_versioning_disabled_creates_separate_files() {
    let engine = engine();
    let owner = Uuid::new_v4();

    let first = upload(&engine, owner, "a.txt", 100).await;
    let toggled = engine
        .lifecycle
        .set_versioning(first.id, owner, false)
        .await
        .unwrap();
    assert!(!toggled.versioning_enabled);

    // Same name no longer appends: a second independent file appears.
    let second = upload(&engine, owner, "a.txt", 50).await;
    assert_ne!(second.id, first.id);
    assert_eq!(second.current_version, 1);

    let files = engine.lifecycle.list(owner, false).await.unwrap();
    assert_eq!(files.len(), 2);
    let snapshot = engine.lifecycle.quota(owner).await.unwrap();
    assert_eq!(snapshot.used, 150, "both files stay charged");

    // Re-enabling makes the next upload append to that file again.
    engine
        .lifecycle
        .set_versioning(second.id, owner, true)
        .await
        .unwrap();
    let appended = upload(&engine, owner, "a.txt", 30).await;
    assert_eq!(appended.id, second.id);
    assert_eq!(appended.current_version, 2);
}

#[tokio::test]
async fn test_version_download_returns_historical_content() {
    let engine = engine();
    let owner = Uuid::new_v4();

    engine
        .lifecycle
        .upload(
            owner,
            stratus_engine::file::UploadParams {
                file_name: "a.txt".to_string(),
                mime_type: Some("text/plain".to_string()),
                data: bytes::Bytes::from_static(b"first draft"),
            },
        )
        .await
        .unwrap();
    let file = engine
        .lifecycle
        .upload(
            owner,
            stratus_engine::file::UploadParams {
                file_name: "a.txt".to_string(),
                mime_type: Some("text/plain".to_string()),
                data: bytes::Bytes::from_static(b"final"),
            },
        )
        .await
        .unwrap();

    let (_, version, data) = engine
        .lifecycle
        .download_version(file.id, owner, 1)
        .await
        .unwrap();
    assert_eq!(version.version_number, 1);
    assert_eq!(&data[..], b"first draft");

    let err = engine
        .lifecycle
        .download_version(file.id, owner, 9)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_share_and_shared_download() {
    let engine = engine();
    let owner = Uuid::new_v4();
    let file = upload(&engine, owner, "a.txt", 100).await;

    let shared = engine
        .lifecycle
        .set_visibility(file.id, owner, true)
        .await
        .unwrap();
    let token = shared.share_token.clone().expect("token generated");

    let (public_file, data) = engine.lifecycle.shared_download(&token).await.unwrap();
    assert_eq!(public_file.id, file.id);
    assert_eq!(data.len(), 100);

    // Revoking clears the token and hides the file.
    let private = engine
        .lifecycle
        .set_visibility(file.id, owner, false)
        .await
        .unwrap();
    assert!(private.share_token.is_none());
    assert!(!private.is_public);

    let err = engine.lifecycle.shared(&token).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_foreign_files_look_absent() {
    let engine = engine();
    let owner = Uuid::new_v4();
    let stranger = Uuid::new_v4();
    let file = upload(&engine, owner, "a.txt", 100).await;

    let err = engine.lifecycle.trash(file.id, stranger).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    let err = engine
        .lifecycle
        .download(file.id, stranger)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_empty_upload_is_rejected() {
    let engine = engine();
    let owner = Uuid::new_v4();

    let err = engine
        .lifecycle
        .upload(
            owner,
            stratus_engine::file::UploadParams {
                file_name: "a.txt".to_string(),
                mime_type: None,
                data: bytes::Bytes::new(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let snapshot = engine.lifecycle.quota(owner).await.unwrap();
    assert_eq!(snapshot.used, 0);
}

#[tokio::test]
async fn test_download_round_trip() {
    let engine = engine();
    let owner = Uuid::new_v4();
    let file = upload(&engine, owner, "a.txt", 64).await;

    let (meta, data) = engine.lifecycle.download(file.id, owner).await.unwrap();
    assert_eq!(meta.id, file.id);
    assert_eq!(data.len(), 64);
}
