//! Bulk operation scenarios: partial failure, batch-size limits, and
//! quota effects of batched lifecycle actions.

mod helpers;

use uuid::Uuid;

use stratus_core::error::ErrorKind;
use stratus_engine::file::{BulkAction, MAX_BULK_ITEMS};

use helpers::{engine, upload};

#[tokio::test]
async fn test_bulk_delete_skips_missing_ids() {
    let engine = engine();
    let owner = Uuid::new_v4();

    let a = upload(&engine, owner, "a.txt", 10).await;
    let b = upload(&engine, owner, "b.txt", 20).await;
    let missing = Uuid::new_v4();

    let outcome = engine
        .bulk
        .run(owner, BulkAction::Delete, &[a.id, missing, b.id])
        .await
        .unwrap();

    assert_eq!(outcome.requested_count, 3);
    assert_eq!(outcome.succeeded_count, 2);
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].file_id, missing);
    assert_eq!(outcome.errors[0].kind, ErrorKind::NotFound);

    // Both real files were trashed; quota fully released.
    let snapshot = engine.lifecycle.quota(owner).await.unwrap();
    assert_eq!(snapshot.used, 0);
    assert_eq!(engine.lifecycle.list(owner, true).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_bulk_rejects_oversized_batch_wholesale() {
    let engine = engine();
    let owner = Uuid::new_v4();
    let file = upload(&engine, owner, "a.txt", 10).await;

    let mut ids = vec![file.id];
    ids.extend((0..MAX_BULK_ITEMS).map(|_| Uuid::new_v4()));

    let err = engine
        .bulk
        .run(owner, BulkAction::Delete, &ids)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    // Nothing ran, not even the valid leading id.
    let snapshot = engine.lifecycle.quota(owner).await.unwrap();
    assert_eq!(snapshot.used, 10);
    assert!(engine.lifecycle.list(owner, true).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_bulk_rejects_empty_batch() {
    let engine = engine();
    let owner = Uuid::new_v4();

    let err = engine
        .bulk
        .run(owner, BulkAction::Restore, &[])
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_bulk_restore_reports_state_errors_per_item() {
    let engine = engine();
    let owner = Uuid::new_v4();

    let trashed = upload(&engine, owner, "a.txt", 10).await;
    let active = upload(&engine, owner, "b.txt", 20).await;
    engine.lifecycle.trash(trashed.id, owner).await.unwrap();

    let outcome = engine
        .bulk
        .run(owner, BulkAction::Restore, &[trashed.id, active.id])
        .await
        .unwrap();

    assert_eq!(outcome.succeeded_count, 1);
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].file_id, active.id);
    assert_eq!(outcome.errors[0].kind, ErrorKind::InvalidOperation);

    let snapshot = engine.lifecycle.quota(owner).await.unwrap();
    assert_eq!(snapshot.used, 30);
}

#[tokio::test]
async fn test_bulk_permanent_delete_empties_trash() {
    let engine = engine();
    let owner = Uuid::new_v4();

    let a = upload(&engine, owner, "a.txt", 10).await;
    let b = upload(&engine, owner, "b.txt", 20).await;
    engine
        .bulk
        .run(owner, BulkAction::Delete, &[a.id, b.id])
        .await
        .unwrap();

    let outcome = engine
        .bulk
        .run(owner, BulkAction::PermanentDelete, &[a.id, b.id])
        .await
        .unwrap();
    assert_eq!(outcome.succeeded_count, 2);
    assert!(outcome.errors.is_empty());

    assert!(engine.lifecycle.list(owner, true).await.unwrap().is_empty());
    assert!(engine.blobs.is_empty());
    let snapshot = engine.lifecycle.quota(owner).await.unwrap();
    assert_eq!(snapshot.used, 0);
}

#[tokio::test]
async fn test_bulk_share_and_unshare() {
    let engine = engine();
    let owner = Uuid::new_v4();

    let a = upload(&engine, owner, "a.txt", 10).await;
    let b = upload(&engine, owner, "b.txt", 20).await;

    let outcome = engine
        .bulk
        .run(owner, BulkAction::Share, &[a.id, b.id])
        .await
        .unwrap();
    assert_eq!(outcome.succeeded_count, 2);

    let files = engine.lifecycle.list(owner, false).await.unwrap();
    assert!(files.iter().all(|f| f.is_public && f.share_token.is_some()));

    engine
        .bulk
        .run(owner, BulkAction::Unshare, &[a.id, b.id])
        .await
        .unwrap();
    let files = engine.lifecycle.list(owner, false).await.unwrap();
    assert!(files.iter().all(|f| !f.is_public && f.share_token.is_none()));
}

#[tokio::test]
async fn test_bulk_cannot_touch_foreign_files() {
    let engine = engine();
    let owner = Uuid::new_v4();
    let stranger = Uuid::new_v4();
    let file = upload(&engine, owner, "a.txt", 10).await;

    let outcome = engine
        .bulk
        .run(stranger, BulkAction::Delete, &[file.id])
        .await
        .unwrap();

    assert_eq!(outcome.succeeded_count, 0);
    assert_eq!(outcome.errors[0].kind, ErrorKind::NotFound);

    // The owner's file is untouched.
    let snapshot = engine.lifecycle.quota(owner).await.unwrap();
    assert_eq!(snapshot.used, 10);
}
