//! Storage layer tests for Quill accounts.

use quill_core::db::DatabaseError;

use super::db::AccountDatabase;
use super::models::ROLE_USER;

async fn test_db() -> AccountDatabase {
    AccountDatabase::open_in_memory().await.unwrap()
}

async fn create_alice(db: &AccountDatabase) {
    db.create_account("a1", "alice@example.com", "Alice", "alice-blog", "hash123")
        .await
        .unwrap();
}

// === Account tests ===

#[tokio::test]
async fn create_and_get_account() {
    let db = test_db().await;
    let account = db
        .create_account("a1", "alice@example.com", "Alice", "alice-blog", "hash123")
        .await
        .unwrap();

    assert_eq!(account.id, "a1");
    assert_eq!(account.email, "alice@example.com");
    assert_eq!(account.blog_id, "alice-blog");
    assert_eq!(account.deleted, 0);
    assert_eq!(account.biography, None);
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let db = test_db().await;
    create_alice(&db).await;

    let err = db
        .create_account("a2", "alice@example.com", "Other", "other-blog", "hash456")
        .await
        .unwrap_err();

    assert!(matches!(err, DatabaseError::Conflict(_)));
}

#[tokio::test]
async fn duplicate_blog_id_is_a_conflict() {
    let db = test_db().await;
    create_alice(&db).await;

    let err = db
        .create_account("a2", "other@example.com", "Other", "alice-blog", "hash456")
        .await
        .unwrap_err();

    match err {
        DatabaseError::Conflict(msg) => assert!(msg.contains("blog_id")),
        other => panic!("expected conflict, got {other:?}"),
    }
}

#[tokio::test]
async fn exists_by_email_and_blog_id() {
    let db = test_db().await;
    create_alice(&db).await;

    assert!(db.exists_by_email("alice@example.com").await.unwrap());
    assert!(!db.exists_by_email("bob@example.com").await.unwrap());
    assert!(db.exists_by_blog_id("alice-blog").await.unwrap());
    assert!(!db.exists_by_blog_id("bob-blog").await.unwrap());
}

#[tokio::test]
async fn find_by_email_skips_deleted_accounts() {
    let db = test_db().await;
    create_alice(&db).await;

    let found = db
        .find_by_email_not_deleted("alice@example.com")
        .await
        .unwrap();
    assert!(found.is_some());

    assert!(db.mark_deleted("a1").await.unwrap());

    let found = db
        .find_by_email_not_deleted("alice@example.com")
        .await
        .unwrap();
    assert!(found.is_none());

    // The row itself survives, and the email stays occupied.
    assert_eq!(db.get_account("a1").await.unwrap().deleted, 1);
    assert!(db.exists_by_email("alice@example.com").await.unwrap());
}

#[tokio::test]
async fn update_password_overwrites_the_hash() {
    let db = test_db().await;
    create_alice(&db).await;

    db.update_password("a1", "newhash").await.unwrap();
    assert_eq!(db.get_account("a1").await.unwrap().password_hash, "newhash");

    let err = db.update_password("missing", "x").await.unwrap_err();
    assert!(matches!(err, DatabaseError::NotFound(_)));
}

#[tokio::test]
async fn update_profile_keeps_absent_fields() {
    let db = test_db().await;
    create_alice(&db).await;

    let account = db
        .update_profile("a1", None, Some("writes about Rust"), None, Some("Seoul"), None)
        .await
        .unwrap();
    assert_eq!(account.name, "Alice");
    assert_eq!(account.biography.as_deref(), Some("writes about Rust"));
    assert_eq!(account.location.as_deref(), Some("Seoul"));

    let account = db
        .update_profile("a1", Some("Alice Kim"), None, None, None, None)
        .await
        .unwrap();
    assert_eq!(account.name, "Alice Kim");
    assert_eq!(account.biography.as_deref(), Some("writes about Rust"));
}

// === Role tests ===

#[tokio::test]
async fn ensure_role_is_idempotent() {
    let db = test_db().await;

    let first = db.ensure_role(ROLE_USER).await.unwrap();
    let second = db.ensure_role(ROLE_USER).await.unwrap();

    assert_eq!(first.name, ROLE_USER);
    assert_eq!(first.created_at, second.created_at);
}

#[tokio::test]
async fn assign_role_is_idempotent() {
    let db = test_db().await;
    create_alice(&db).await;
    db.ensure_role(ROLE_USER).await.unwrap();

    db.assign_role("a1", ROLE_USER).await.unwrap();
    db.assign_role("a1", ROLE_USER).await.unwrap();

    assert_eq!(db.roles_for_account("a1").await.unwrap(), vec![ROLE_USER]);
}

#[tokio::test]
async fn roles_for_account_lists_all_assigned() {
    let db = test_db().await;
    create_alice(&db).await;
    db.ensure_role("admin").await.unwrap();
    db.ensure_role(ROLE_USER).await.unwrap();
    db.assign_role("a1", "admin").await.unwrap();
    db.assign_role("a1", ROLE_USER).await.unwrap();

    assert_eq!(
        db.roles_for_account("a1").await.unwrap(),
        vec!["admin".to_string(), ROLE_USER.to_string()]
    );
}

#[tokio::test]
async fn open_on_disk_creates_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("accounts.db");

    let db = AccountDatabase::open(&path).await.unwrap();
    create_alice(&db).await;

    assert!(path.exists());
}
