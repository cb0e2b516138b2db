//! Core traits for recollect abstractions.
//!
//! These traits define the seams between the ingestion pipeline and its
//! external collaborators, enabling pluggable backends and testability.

use async_trait::async_trait;
use url::Url;
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// BOOKMARK REPOSITORY
// =============================================================================

/// Repository for bookmark records.
#[async_trait]
pub trait BookmarkRepository: Send + Sync {
    /// True if a non-trashed bookmark with exactly this URL exists in the
    /// given collection.
    async fn exists_in_collection(&self, url: &str, collection_id: i64) -> Result<bool>;

    /// Insert a bookmark and return the rows the store reports as written.
    async fn insert_returning(&self, bookmark: NewBookmark) -> Result<Vec<BookmarkRecord>>;
}

// =============================================================================
// COLLECTION ACCESS REPOSITORY
// =============================================================================

/// Repository for collection ownership and collaborator grants.
#[async_trait]
pub trait CollectionAccessRepository: Send + Sync {
    /// Owner of the collection, `None` if the collection does not exist.
    async fn owner_of(&self, collection_id: i64) -> Result<Option<Uuid>>;

    /// Edit access granted to the collaborator with this email, `None` if no
    /// collaborator record exists.
    async fn collaborator_edit_access(&self, collection_id: i64, email: &str)
        -> Result<Option<bool>>;
}

// =============================================================================
// IDENTITY
// =============================================================================

/// Resolves an access token into the authenticated identity.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// `Ok(None)` for unknown, expired or revoked tokens.
    async fn resolve(&self, access_token: &str) -> Result<Option<Identity>>;
}

// =============================================================================
// PAGE SCRAPER
// =============================================================================

/// Fetches a page and extracts preview metadata.
#[async_trait]
pub trait PageScraper: Send + Sync {
    /// Fails with `Error::Fetch` on network failure, timeout or HTTP status
    /// of 400 or above.
    async fn scrape(&self, url: &Url) -> Result<ScrapedMetadata>;
}
