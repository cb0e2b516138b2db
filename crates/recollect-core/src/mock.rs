//! In-memory collaborators for deterministic testing.
//!
//! Each mock records the calls it receives so tests can assert that a
//! pipeline stage was (or was not) reached.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use recollect_core::mock::{MockBookmarkRepository, MockCollectionRepository};
//! use uuid::Uuid;
//!
//! let owner = Uuid::new_v4();
//! let collections = MockCollectionRepository::new().with_owner(7, owner);
//! let bookmarks = MockBookmarkRepository::new().with_existing("https://example.com", 7);
//! assert_eq!(bookmarks.insert_count(), 0);
//! # let _ = collections;
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use url::Url;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::*;
use crate::traits::*;

// =============================================================================
// BOOKMARKS
// =============================================================================

/// Bookmark store backed by a vector.
#[derive(Clone, Default)]
pub struct MockBookmarkRepository {
    rows: Arc<Mutex<Vec<BookmarkRecord>>>,
    next_id: Arc<AtomicI64>,
    lookups: Arc<AtomicUsize>,
    inserts: Arc<AtomicUsize>,
    fail_lookups: bool,
    fail_inserts: bool,
    empty_inserts: bool,
}

impl MockBookmarkRepository {
    pub fn new() -> Self {
        Self {
            next_id: Arc::new(AtomicI64::new(1)),
            ..Default::default()
        }
    }

    /// Seed a non-trashed bookmark in the given collection.
    pub fn with_existing(self, url: &str, collection_id: i64) -> Self {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.lock().push(BookmarkRecord {
            id,
            url: url.to_string(),
            title: None,
            description: None,
            og_image: None,
            category_id: Some(collection_id),
            user_id: Uuid::nil(),
            meta_data: MediaDescriptor {
                media_type: crate::media::MediaType::Link,
                is_og_image_preferred: false,
                iframe_allowed: Some(false),
                fav_icon: None,
            },
            record_type: crate::defaults::BOOKMARK_TYPE.to_string(),
            trash: false,
            inserted_at: Utc::now(),
        });
        self
    }

    /// Mark every stored bookmark with this URL as trashed.
    pub fn trash(&self, url: &str) {
        for row in self.lock().iter_mut().filter(|r| r.url == url) {
            row.trash = true;
        }
    }

    pub fn failing_lookups(mut self) -> Self {
        self.fail_lookups = true;
        self
    }

    pub fn failing_inserts(mut self) -> Self {
        self.fail_inserts = true;
        self
    }

    /// Inserts succeed but report no rows.
    pub fn empty_inserts(mut self) -> Self {
        self.empty_inserts = true;
        self
    }

    /// All stored rows, seeded ones included.
    pub fn rows(&self) -> Vec<BookmarkRecord> {
        self.lock().clone()
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn insert_count(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<BookmarkRecord>> {
        self.rows.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl BookmarkRepository for MockBookmarkRepository {
    async fn exists_in_collection(&self, url: &str, collection_id: i64) -> Result<bool> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail_lookups {
            return Err(Error::Lookup("mock lookup failure".to_string()));
        }
        Ok(self
            .lock()
            .iter()
            .any(|r| r.url == url && r.category_id == Some(collection_id) && !r.trash))
    }

    async fn insert_returning(&self, bookmark: NewBookmark) -> Result<Vec<BookmarkRecord>> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        if self.fail_inserts {
            return Err(Error::Store("mock insert failure".to_string()));
        }
        if self.empty_inserts {
            return Ok(Vec::new());
        }

        let record = BookmarkRecord {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            url: bookmark.url,
            title: bookmark.title,
            description: bookmark.description,
            og_image: bookmark.og_image,
            category_id: bookmark.category_id,
            user_id: bookmark.user_id,
            meta_data: bookmark.meta_data,
            record_type: bookmark.record_type,
            trash: bookmark.trash,
            inserted_at: Utc::now(),
        };
        self.lock().push(record.clone());
        Ok(vec![record])
    }
}

// =============================================================================
// COLLECTIONS
// =============================================================================

/// Collection ownership and collaborator grants held in maps.
#[derive(Clone, Default)]
pub struct MockCollectionRepository {
    owners: HashMap<i64, Uuid>,
    collaborators: HashMap<(i64, String), bool>,
    calls: Arc<AtomicUsize>,
    fail: bool,
}

impl MockCollectionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_owner(mut self, collection_id: i64, owner: Uuid) -> Self {
        self.owners.insert(collection_id, owner);
        self
    }

    pub fn with_collaborator(mut self, collection_id: i64, email: &str, edit_access: bool) -> Self {
        self.collaborators
            .insert((collection_id, email.to_string()), edit_access);
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Number of ownership and collaborator lookups served.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record_call(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(Error::Lookup("mock collection lookup failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CollectionAccessRepository for MockCollectionRepository {
    async fn owner_of(&self, collection_id: i64) -> Result<Option<Uuid>> {
        self.record_call()?;
        Ok(self.owners.get(&collection_id).copied())
    }

    async fn collaborator_edit_access(
        &self,
        collection_id: i64,
        email: &str,
    ) -> Result<Option<bool>> {
        self.record_call()?;
        Ok(self
            .collaborators
            .get(&(collection_id, email.to_string()))
            .copied())
    }
}

// =============================================================================
// IDENTITY
// =============================================================================

/// Token-to-identity table.
#[derive(Clone, Default)]
pub struct StaticIdentityResolver {
    tokens: HashMap<String, Identity>,
    fail: bool,
}

impl StaticIdentityResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token: &str, identity: Identity) -> Self {
        self.tokens.insert(token.to_string(), identity);
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }
}

#[async_trait]
impl IdentityResolver for StaticIdentityResolver {
    async fn resolve(&self, access_token: &str) -> Result<Option<Identity>> {
        if self.fail {
            return Err(Error::Lookup("mock identity failure".to_string()));
        }
        Ok(self.tokens.get(access_token).cloned())
    }
}

// =============================================================================
// SCRAPER
// =============================================================================

/// Scraper returning canned metadata per URL.
///
/// Unknown URLs get `default` metadata; a failing scraper errors for every URL.
#[derive(Clone, Default)]
pub struct MockScraper {
    pages: HashMap<String, ScrapedMetadata>,
    default: ScrapedMetadata,
    calls: Arc<AtomicUsize>,
    fail: bool,
}

impl MockScraper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, metadata: ScrapedMetadata) -> Self {
        self.pages.insert(url.to_string(), metadata);
        self
    }

    pub fn with_default(mut self, metadata: ScrapedMetadata) -> Self {
        self.default = metadata;
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageScraper for MockScraper {
    async fn scrape(&self, url: &Url) -> Result<ScrapedMetadata> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(Error::Fetch("request timed out: mock".to_string()));
        }
        Ok(self
            .pages
            .get(url.as_str())
            .cloned()
            .unwrap_or_else(|| self.default.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_bookmark(url: &str, category_id: Option<i64>) -> NewBookmark {
        NewBookmark {
            url: url.to_string(),
            title: Some("t".to_string()),
            description: None,
            og_image: None,
            category_id,
            user_id: Uuid::new_v4(),
            meta_data: MediaDescriptor {
                media_type: crate::media::MediaType::Link,
                is_og_image_preferred: false,
                iframe_allowed: Some(false),
                fav_icon: None,
            },
            record_type: "bookmark".to_string(),
            trash: false,
        }
    }

    #[tokio::test]
    async fn test_mock_bookmarks_dedupe_ignores_trash() {
        let repo = MockBookmarkRepository::new().with_existing("https://a.example", 3);
        assert!(repo.exists_in_collection("https://a.example", 3).await.unwrap());
        assert!(!repo.exists_in_collection("https://a.example", 4).await.unwrap());

        repo.trash("https://a.example");
        assert!(!repo.exists_in_collection("https://a.example", 3).await.unwrap());
        assert_eq!(repo.lookup_count(), 3);
    }

    #[tokio::test]
    async fn test_mock_bookmarks_insert_assigns_ids() {
        let repo = MockBookmarkRepository::new();
        let first = repo
            .insert_returning(new_bookmark("https://a.example", None))
            .await
            .unwrap();
        let second = repo
            .insert_returning(new_bookmark("https://b.example", Some(2)))
            .await
            .unwrap();
        assert_eq!(first.len(), 1);
        assert_ne!(first[0].id, second[0].id);
        assert_eq!(repo.rows().len(), 2);
        assert_eq!(repo.insert_count(), 2);
    }

    #[tokio::test]
    async fn test_mock_collections_lookup() {
        let owner = Uuid::new_v4();
        let repo = MockCollectionRepository::new()
            .with_owner(1, owner)
            .with_collaborator(1, "c@example.com", false);
        assert_eq!(repo.owner_of(1).await.unwrap(), Some(owner));
        assert_eq!(repo.owner_of(2).await.unwrap(), None);
        assert_eq!(
            repo.collaborator_edit_access(1, "c@example.com").await.unwrap(),
            Some(false)
        );
        assert_eq!(repo.call_count(), 3);
    }

    #[tokio::test]
    async fn test_mock_scraper_failure() {
        let scraper = MockScraper::new().failing();
        let url = Url::parse("https://example.com").unwrap();
        assert!(matches!(scraper.scrape(&url).await, Err(Error::Fetch(_))));
        assert_eq!(scraper.call_count(), 1);
    }
}
