//! Data models for bookmark submission and storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::defaults::UNCATEGORIZED_PAGES;
use crate::error::{Error, Result};
use crate::media::MediaType;

// =============================================================================
// SUBMISSION
// =============================================================================

/// Collection identifier exactly as a client sent it.
///
/// Clients send the id as a JSON number, a float (some JS clients), or a
/// string (including `"null"` and UI page slugs). `null` and a missing field
/// both deserialize to `None` on the enclosing `Option`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CategoryIdInput {
    Integer(i64),
    Float(f64),
    Text(String),
}

/// Normalized target of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionTarget {
    /// Default catch-all bucket; no ownership or duplicate checks apply.
    Uncategorized,
    /// A real, user-owned collection.
    Collection(i64),
}

impl CollectionTarget {
    /// Normalize the optional raw collection id.
    ///
    /// - absent, `null`, `"null"`, `0`, `"0"` and pseudo-page slugs map to
    ///   [`CollectionTarget::Uncategorized`]
    /// - numeric strings are parsed, floats are truncated
    /// - any other string, or a negative id, is rejected
    pub fn from_input(input: Option<&CategoryIdInput>) -> Result<Self> {
        let id = match input {
            None => return Ok(CollectionTarget::Uncategorized),
            Some(CategoryIdInput::Integer(v)) => *v,
            Some(CategoryIdInput::Float(v)) => {
                if !v.is_finite() {
                    return Err(Error::InvalidInput("Invalid category ID".to_string()));
                }
                v.trunc() as i64
            }
            Some(CategoryIdInput::Text(s)) => {
                let s = s.trim();
                if s == "null" || is_uncategorized_page(s) {
                    return Ok(CollectionTarget::Uncategorized);
                }
                s.parse::<i64>()
                    .map_err(|_| Error::InvalidInput(format!("Invalid category ID: '{}'", s)))?
            }
        };

        match id {
            0 => Ok(CollectionTarget::Uncategorized),
            id if id < 0 => Err(Error::InvalidInput(format!(
                "Invalid category ID: {} (must be positive)",
                id
            ))),
            id => Ok(CollectionTarget::Collection(id)),
        }
    }

    /// The collection id to persist (`None` for uncategorized).
    pub fn id(&self) -> Option<i64> {
        match self {
            CollectionTarget::Uncategorized => None,
            CollectionTarget::Collection(id) => Some(*id),
        }
    }
}

fn is_uncategorized_page(s: &str) -> bool {
    UNCATEGORIZED_PAGES
        .iter()
        .any(|page| page.eq_ignore_ascii_case(s))
}

/// Inbound submission payload.
///
/// Every field defaults so that a missing field is reported by validation
/// with a specific message instead of a generic deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmissionRequest {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub category_id: Option<CategoryIdInput>,
    #[serde(default)]
    pub update_access: bool,
    #[serde(default)]
    pub access_token: String,
}

impl SubmissionRequest {
    /// Validate and normalize the submission.
    ///
    /// The write-access flag is checked before anything else, so a request
    /// without write access is always rejected as forbidden.
    pub fn validate(self) -> Result<ValidatedSubmission> {
        if !self.update_access {
            return Err(Error::Forbidden(
                "User does not have update access".to_string(),
            ));
        }

        let raw_url = self.url.trim().to_string();
        if raw_url.is_empty() {
            return Err(Error::InvalidInput("URL is required".to_string()));
        }

        let parsed =
            Url::parse(&raw_url).map_err(|e| Error::InvalidInput(format!("Invalid URL: {}", e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::InvalidInput(format!(
                "Unsupported URL scheme: {}",
                parsed.scheme()
            )));
        }
        if parsed.host_str().map_or(true, str::is_empty) {
            return Err(Error::InvalidInput("URL has no host".to_string()));
        }

        let target = CollectionTarget::from_input(self.category_id.as_ref())?;

        Ok(ValidatedSubmission {
            url: raw_url,
            parsed,
            target,
            access_token: self.access_token,
        })
    }
}

/// A submission that passed validation.
#[derive(Debug, Clone)]
pub struct ValidatedSubmission {
    /// URL as submitted (trimmed); stored and compared verbatim.
    pub url: String,
    /// Parsed form of `url`, always http(s) with a host.
    pub parsed: Url,
    pub target: CollectionTarget,
    pub access_token: String,
}

// =============================================================================
// IDENTITY & ACCESS
// =============================================================================

/// Authenticated submitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    /// Contact address used to match collaborator invitations.
    pub email: String,
}

/// Result of the ownership and collaborator lookups for one collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectionAuthorization {
    pub is_owner: bool,
    pub has_edit_access: bool,
}

impl CollectionAuthorization {
    pub fn allows_write(&self) -> bool {
        self.is_owner || self.has_edit_access
    }
}

// =============================================================================
// SCRAPED METADATA
// =============================================================================

/// Best-effort metadata scraped from a page. Every field is independent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapedMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub og_image: Option<String>,
    pub fav_icon: Option<String>,
}

impl ScrapedMetadata {
    /// Substitute used when the page could not be fetched: the hostname as
    /// title and nothing else.
    pub fn hostname_fallback(url: &Url) -> Self {
        Self {
            title: url.host_str().map(str::to_string),
            ..Default::default()
        }
    }

    pub fn is_complete(&self) -> bool {
        self.title.is_some() && self.description.is_some() && self.og_image.is_some()
    }
}

// =============================================================================
// BOOKMARK RECORDS
// =============================================================================

/// Media metadata persisted in the record's `meta_data` column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaDescriptor {
    pub media_type: MediaType,
    pub is_og_image_preferred: bool,
    /// `None` when the preview comes from a preferred source and embedding was
    /// never evaluated.
    pub iframe_allowed: Option<bool>,
    pub fav_icon: Option<String>,
}

/// A bookmark ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBookmark {
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub og_image: Option<String>,
    /// `None` for uncategorized.
    pub category_id: Option<i64>,
    pub user_id: Uuid,
    pub meta_data: MediaDescriptor,
    pub record_type: String,
    pub trash: bool,
}

/// A persisted bookmark as returned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookmarkRecord {
    pub id: i64,
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "ogImage")]
    pub og_image: Option<String>,
    pub category_id: Option<i64>,
    pub user_id: Uuid,
    pub meta_data: MediaDescriptor,
    #[serde(rename = "type")]
    pub record_type: String,
    pub trash: bool,
    pub inserted_at: DateTime<Utc>,
}
