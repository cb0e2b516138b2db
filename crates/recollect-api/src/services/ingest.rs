//! Bookmark ingestion pipeline.
//!
//! ## Stages
//!
//! 1. Validate the submission (write-access flag first, then URL and collection)
//! 2. Resolve the access token to an identity
//! 3. For a real collection: authorize, then reject duplicates
//! 4. Scrape page metadata, falling back to the hostname on any fetch failure
//! 5. Classify media and pick the preview image
//! 6. Persist and return the stored record
//!
//! Stages 1 to 3 may reject the submission; nothing is written when they do.
//! The uncategorized collection skips stage 3 entirely.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use recollect_core::defaults::BOOKMARK_TYPE;
use recollect_core::{
    classify, is_direct_media, BookmarkRecord, BookmarkRepository, CollectionAccessRepository,
    CollectionTarget, Error, HostPolicy, Identity, IdentityResolver, MediaDescriptor,
    NewBookmark, PageScraper, Result, ScrapedMetadata, SubmissionRequest, ValidatedSubmission,
};

use super::access::{as_lookup, AccessService};

/// Rejection message when the caller is neither owner nor editor.
pub const NOT_AUTHORIZED_MESSAGE: &str = "User is neither owner or collaborator for the collection";

/// Rejection message when the URL is already in the collection.
pub const DUPLICATE_MESSAGE: &str = "Bookmark already present in this category";

/// Orchestrates one submission through every stage.
#[derive(Clone)]
pub struct IngestService {
    identity: Arc<dyn IdentityResolver>,
    access: AccessService,
    bookmarks: Arc<dyn BookmarkRepository>,
    scraper: Arc<dyn PageScraper>,
    hosts: Arc<HostPolicy>,
}

impl IngestService {
    pub fn new(
        identity: Arc<dyn IdentityResolver>,
        collections: Arc<dyn CollectionAccessRepository>,
        bookmarks: Arc<dyn BookmarkRepository>,
        scraper: Arc<dyn PageScraper>,
        hosts: HostPolicy,
    ) -> Self {
        Self {
            identity,
            access: AccessService::new(collections),
            bookmarks,
            scraper,
            hosts: Arc::new(hosts),
        }
    }

    /// Run a submission to completion.
    pub async fn submit(&self, request: SubmissionRequest) -> Result<Vec<BookmarkRecord>> {
        let start = Instant::now();

        let submission = request.validate()?;
        let identity = self.identify(&submission.access_token).await?;

        if let CollectionTarget::Collection(collection_id) = submission.target {
            self.authorize_and_dedupe(&submission.url, collection_id, &identity)
                .await?;
        }

        let scraped = self.scrape(&submission).await;
        let bookmark = self.build_bookmark(&submission, &identity, scraped);
        let media_type = bookmark.meta_data.media_type;

        let records = self
            .bookmarks
            .insert_returning(bookmark)
            .await
            .map_err(|e| match e {
                Error::Store(_) => e,
                other => Error::Store(other.to_string()),
            })?;

        if records.is_empty() {
            return Err(Error::Store("No data returned after insert".to_string()));
        }

        info!(
            subsystem = "ingest",
            component = "pipeline",
            op = "submit",
            url = %submission.url,
            collection_id = ?submission.target.id(),
            user_id = %identity.user_id,
            bookmark_id = records[0].id,
            media_type = %media_type,
            duration_ms = start.elapsed().as_millis() as u64,
            "Bookmark added"
        );

        Ok(records)
    }

    async fn identify(&self, access_token: &str) -> Result<Identity> {
        match self.identity.resolve(access_token).await {
            Ok(Some(identity)) => Ok(identity),
            Ok(None) => Err(Error::Unauthorized(
                "Invalid or expired access token".to_string(),
            )),
            Err(e) => Err(as_lookup(e)),
        }
    }

    async fn authorize_and_dedupe(
        &self,
        url: &str,
        collection_id: i64,
        identity: &Identity,
    ) -> Result<()> {
        if !self.access.can_write(collection_id, identity).await? {
            debug!(
                subsystem = "ingest",
                component = "pipeline",
                op = "authorize",
                collection_id,
                user_id = %identity.user_id,
                "Submission rejected: no write access to collection"
            );
            return Err(Error::Forbidden(NOT_AUTHORIZED_MESSAGE.to_string()));
        }

        let duplicate = self
            .bookmarks
            .exists_in_collection(url, collection_id)
            .await
            .map_err(as_lookup)?;
        if duplicate {
            debug!(
                subsystem = "ingest",
                component = "pipeline",
                op = "dedupe",
                collection_id,
                url = %url,
                "Submission rejected: duplicate"
            );
            return Err(Error::Conflict(DUPLICATE_MESSAGE.to_string()));
        }

        Ok(())
    }

    async fn scrape(&self, submission: &ValidatedSubmission) -> ScrapedMetadata {
        match self.scraper.scrape(&submission.parsed).await {
            Ok(meta) => meta,
            Err(e) => {
                warn!(
                    subsystem = "ingest",
                    component = "pipeline",
                    op = "scrape",
                    url = %submission.url,
                    error = %e,
                    fallback = true,
                    "Scrape failed, using hostname as title"
                );
                ScrapedMetadata::hostname_fallback(&submission.parsed)
            }
        }
    }

    fn build_bookmark(
        &self,
        submission: &ValidatedSubmission,
        identity: &Identity,
        scraped: ScrapedMetadata,
    ) -> NewBookmark {
        let media_type = classify(&submission.url);
        let direct_media = is_direct_media(&submission.url);
        let preview = self.hosts.resolve(
            &submission.url,
            &submission.parsed,
            scraped.og_image,
            direct_media,
        );

        NewBookmark {
            url: submission.url.clone(),
            title: scraped.title,
            description: scraped.description,
            og_image: preview.og_image,
            category_id: submission.target.id(),
            user_id: identity.user_id,
            meta_data: MediaDescriptor {
                media_type,
                is_og_image_preferred: preview.is_og_image_preferred,
                iframe_allowed: preview.iframe_allowed,
                fav_icon: scraped.fav_icon,
            },
            record_type: BOOKMARK_TYPE.to_string(),
            trash: false,
        }
    }
}
