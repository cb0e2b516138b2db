//! URL-based media classification.
//!
//! Pure suffix inspection; nothing is fetched. Two questions are answered:
//! which media type a URL points at, and whether the URL is itself a media
//! asset (in which case it becomes its own preview image).

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Media type tag stored on every bookmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
    Document,
    Link,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Video => "video",
            MediaType::Document => "document",
            MediaType::Link => "link",
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const DOCUMENT_SUFFIXES: &[&str] = &[".pdf"];
const VIDEO_SUFFIXES: &[&str] = &[".mp4", ".webm", ".avi"];
const IMAGE_SUFFIXES: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".webp"];

/// Direct media asset pattern: every classified suffix plus tiff, bmp and mp3,
/// optionally followed by a query string and fragment.
static DIRECT_MEDIA_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\.(jpg|jpeg|gif|png|webp|tiff|bmp|mp3|mp4|webm|avi|pdf)(\?[^#]*)?(#.*)?$")
        .expect("direct media pattern is valid")
});

/// Classify a URL by the suffix of its path.
///
/// Query string and fragment are ignored, so `a.pdf?dl=1` is a document but
/// `https://example.pdf.com/` is a link.
pub fn classify(url: &str) -> MediaType {
    let lower = url.to_ascii_lowercase();
    let path = strip_query(&lower);

    let ends_with_any = |suffixes: &[&str]| suffixes.iter().any(|s| path.ends_with(s));

    if ends_with_any(DOCUMENT_SUFFIXES) {
        MediaType::Document
    } else if ends_with_any(VIDEO_SUFFIXES) {
        MediaType::Video
    } else if ends_with_any(IMAGE_SUFFIXES) {
        MediaType::Image
    } else {
        MediaType::Link
    }
}

/// True if the URL points directly at a media file rather than a page.
pub fn is_direct_media(url: &str) -> bool {
    DIRECT_MEDIA_PATTERN.is_match(&url.to_ascii_lowercase())
}

fn strip_query(url: &str) -> &str {
    url.split(|c| c == '?' || c == '#').next().unwrap_or(url)
}
