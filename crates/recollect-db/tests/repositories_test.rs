//! Integration tests for the PostgreSQL repositories.
//!
//! These require a running PostgreSQL reachable through `DATABASE_URL` and are
//! ignored by default: `cargo test -p recollect-db -- --ignored`.

use chrono::{Duration, Utc};
use uuid::Uuid;

use recollect_db::test_fixtures::TestDatabase;
use recollect_db::{
    BookmarkRepository, CollectionAccessRepository, IdentityResolver, MediaDescriptor, MediaType,
    NewBookmark,
};

fn bookmark(url: &str, category_id: Option<i64>, user_id: Uuid) -> NewBookmark {
    NewBookmark {
        url: url.to_string(),
        title: Some("Example".to_string()),
        description: None,
        og_image: None,
        category_id,
        user_id,
        meta_data: MediaDescriptor {
            media_type: MediaType::Link,
            is_og_image_preferred: false,
            iframe_allowed: Some(false),
            fav_icon: Some("https://example.com/favicon.ico".to_string()),
        },
        record_type: "bookmark".to_string(),
        trash: false,
    }
}

#[tokio::test]
#[ignore]
async fn test_insert_returns_persisted_record() {
    let test_db = TestDatabase::new().await;
    let owner = test_db.create_profile().await;
    let collection = test_db.create_collection(owner.user_id, "reading").await;

    let rows = test_db
        .db
        .bookmarks
        .insert_returning(bookmark(
            "https://example.com/a",
            Some(collection),
            owner.user_id,
        ))
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    let record = &rows[0];
    assert_eq!(record.url, "https://example.com/a");
    assert_eq!(record.category_id, Some(collection));
    assert_eq!(record.record_type, "bookmark");
    assert!(!record.trash);
    assert_eq!(record.meta_data.iframe_allowed, Some(false));

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore]
async fn test_uncategorized_insert_stores_null_collection() {
    let test_db = TestDatabase::new().await;
    let owner = test_db.create_profile().await;

    let rows = test_db
        .db
        .bookmarks
        .insert_returning(bookmark("https://example.com/b", None, owner.user_id))
        .await
        .unwrap();

    assert_eq!(rows[0].category_id, None);
    test_db.cleanup().await;
}

#[tokio::test]
#[ignore]
async fn test_duplicate_lookup_is_collection_local_and_skips_trash() {
    let test_db = TestDatabase::new().await;
    let owner = test_db.create_profile().await;
    let first = test_db.create_collection(owner.user_id, "one").await;
    let second = test_db.create_collection(owner.user_id, "two").await;
    let url = format!("https://example.com/{}", Uuid::new_v4());

    let repo = &test_db.db.bookmarks;
    assert!(!repo.exists_in_collection(&url, first).await.unwrap());

    repo.insert_returning(bookmark(&url, Some(first), owner.user_id))
        .await
        .unwrap();
    assert!(repo.exists_in_collection(&url, first).await.unwrap());
    assert!(!repo.exists_in_collection(&url, second).await.unwrap());

    sqlx::query("UPDATE bookmarks_table SET trash = TRUE WHERE url = $1")
        .bind(&url)
        .execute(&test_db.db.pool)
        .await
        .unwrap();
    assert!(!repo.exists_in_collection(&url, first).await.unwrap());

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore]
async fn test_collection_owner_and_collaborators() {
    let test_db = TestDatabase::new().await;
    let owner = test_db.create_profile().await;
    let editor = test_db.create_profile().await;
    let viewer = test_db.create_profile().await;
    let collection = test_db.create_collection(owner.user_id, "shared").await;
    test_db
        .share_collection(collection, &editor.email, true)
        .await;
    test_db
        .share_collection(collection, &viewer.email, false)
        .await;

    let repo = &test_db.db.collections;
    assert_eq!(repo.owner_of(collection).await.unwrap(), Some(owner.user_id));
    assert_eq!(repo.owner_of(-1).await.unwrap(), None);
    assert_eq!(
        repo.collaborator_edit_access(collection, &editor.email)
            .await
            .unwrap(),
        Some(true)
    );
    assert_eq!(
        repo.collaborator_edit_access(collection, &viewer.email)
            .await
            .unwrap(),
        Some(false)
    );
    assert_eq!(
        repo.collaborator_edit_access(collection, "nobody@example.com")
            .await
            .unwrap(),
        None
    );

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore]
async fn test_token_resolution() {
    let test_db = TestDatabase::new().await;
    let user = test_db.create_profile().await;
    let token = test_db.issue_token(user.user_id).await;

    let resolver = &test_db.db.identity;
    let identity = resolver.resolve(&token).await.unwrap().unwrap();
    assert_eq!(identity, user);

    assert!(resolver.resolve("unknown-token").await.unwrap().is_none());
    assert!(resolver.resolve("").await.unwrap().is_none());

    assert!(resolver.revoke_token(&token).await.unwrap());
    assert!(resolver.resolve(&token).await.unwrap().is_none());

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore]
async fn test_expired_token_does_not_resolve() {
    let test_db = TestDatabase::new().await;
    let user = test_db.create_profile().await;
    let token = format!("expired_{}", Uuid::new_v4().simple());
    test_db
        .db
        .identity
        .store_token(user.user_id, &token, Some(Utc::now() - Duration::minutes(5)))
        .await
        .unwrap();

    assert!(test_db.db.identity.resolve(&token).await.unwrap().is_none());
    test_db.cleanup().await;
}
