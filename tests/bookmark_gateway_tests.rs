// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bookmark gateway tests on the in-memory store.

use tourmark::db::{Database, MemoryDb};
use tourmark::error::{AppError, ErrorKind};
use tourmark::services::{BookmarkGateway, UserService};

/// Gateway plus a synced user "ext-1".
async fn synced_gateway() -> BookmarkGateway {
    let db: Database = MemoryDb::new().into();
    UserService::new(db.clone())
        .sync("ext-1", "Test User")
        .await
        .unwrap();
    BookmarkGateway::new(db)
}

#[tokio::test]
async fn test_unsynced_user_is_rejected() {
    let gateway = BookmarkGateway::new(MemoryDb::new().into());

    let err = gateway.add("ext-unknown", "126508").await.unwrap_err();
    assert!(matches!(err, AppError::AccountNotSynced(_)));
    assert_eq!(err.kind(), ErrorKind::NotSynced);

    let err = gateway.list("ext-unknown").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotSynced);
}

#[tokio::test]
async fn test_duplicate_add_leaves_one_bookmark() {
    let gateway = synced_gateway().await;

    let first = gateway.add("ext-1", "126508").await.unwrap();
    assert_eq!(first.content_id, "126508");

    let err = gateway.add("ext-1", "126508").await.unwrap_err();
    assert!(matches!(err, AppError::Duplicate(_)));
    assert_eq!(err.kind(), ErrorKind::Duplicate);

    let bookmarks = gateway.list("ext-1").await.unwrap();
    assert_eq!(bookmarks.len(), 1);
    assert_eq!(bookmarks[0].id, first.id);
}

#[tokio::test]
async fn test_concurrent_adds_yield_one_bookmark() {
    let gateway = synced_gateway().await;

    let (a, b) = tokio::join!(
        gateway.add("ext-1", "126508"),
        gateway.add("ext-1", "126508")
    );
    assert_eq!(a.is_ok() as u8 + b.is_ok() as u8, 1);
    assert_eq!(gateway.list("ext-1").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_remove_is_idempotent() {
    let gateway = synced_gateway().await;

    gateway.add("ext-1", "126508").await.unwrap();
    gateway.remove("ext-1", "126508").await.unwrap();
    gateway.remove("ext-1", "126508").await.unwrap();
    gateway.remove("ext-1", "never-added").await.unwrap();

    assert!(!gateway.is_bookmarked("ext-1", "126508").await.unwrap());
}

#[tokio::test]
async fn test_list_empty_for_new_user() {
    let gateway = synced_gateway().await;
    assert!(gateway.list("ext-1").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_newest_first() {
    let gateway = synced_gateway().await;

    for content_id in ["1", "2", "3"] {
        gateway.add("ext-1", content_id).await.unwrap();
    }

    let ids: Vec<String> = gateway
        .list("ext-1")
        .await
        .unwrap()
        .into_iter()
        .map(|b| b.content_id)
        .collect();
    assert_eq!(ids, vec!["3", "2", "1"]);
}

#[tokio::test]
async fn test_bookmarks_are_per_user() {
    let db: Database = MemoryDb::new().into();
    let users = UserService::new(db.clone());
    users.sync("ext-1", "One").await.unwrap();
    users.sync("ext-2", "Two").await.unwrap();
    let gateway = BookmarkGateway::new(db);

    gateway.add("ext-1", "126508").await.unwrap();
    gateway.add("ext-2", "126508").await.unwrap();
    gateway.remove("ext-2", "126508").await.unwrap();

    assert!(gateway.is_bookmarked("ext-1", "126508").await.unwrap());
    assert!(!gateway.is_bookmarked("ext-2", "126508").await.unwrap());
}

#[tokio::test]
async fn test_toggle_flips_state() {
    let gateway = synced_gateway().await;

    assert!(gateway.toggle("ext-1", "126508").await.unwrap());
    assert!(gateway.is_bookmarked("ext-1", "126508").await.unwrap());

    assert!(!gateway.toggle("ext-1", "126508").await.unwrap());
    assert!(!gateway.is_bookmarked("ext-1", "126508").await.unwrap());
}

#[tokio::test]
async fn test_remove_many_reports_each_item() {
    let gateway = synced_gateway().await;
    gateway.add("ext-1", "1").await.unwrap();
    gateway.add("ext-1", "2").await.unwrap();
    gateway.add("ext-1", "3").await.unwrap();

    let ids = vec!["1".to_string(), "3".to_string(), " ".to_string()];
    let outcome = gateway.remove_many("ext-1", &ids).await.unwrap();

    assert_eq!(outcome.removed, vec!["1", "3"]);
    assert_eq!(outcome.failed.len(), 1);
    assert_eq!(outcome.failed[0].error, "validation");

    let remaining: Vec<String> = gateway
        .list("ext-1")
        .await
        .unwrap()
        .into_iter()
        .map(|b| b.content_id)
        .collect();
    assert_eq!(remaining, vec!["2"]);
}

#[tokio::test]
async fn test_remove_many_rejects_oversized_batch() {
    let gateway = synced_gateway().await;
    let ids: Vec<String> = (0..101).map(|i| i.to_string()).collect();

    let err = gateway.remove_many("ext-1", &ids).await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
}

#[tokio::test]
async fn test_blank_content_id_rejected() {
    let gateway = synced_gateway().await;
    let err = gateway.add("ext-1", "  ").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}
