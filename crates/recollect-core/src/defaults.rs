//! Centralized default constants for recollect.
//!
//! All crates reference these constants instead of defining their own magic
//! numbers. Organized by domain area.

// =============================================================================
// STORE
// =============================================================================

/// Type tag written on every record produced by the ingestion pipeline.
pub const BOOKMARK_TYPE: &str = "bookmark";

// =============================================================================
// SCRAPING
// =============================================================================

/// Hard timeout for a single scrape request in seconds.
pub const SCRAPE_TIMEOUT_SECS: u64 = 10;

/// Maximum number of body bytes read from a scrape target (512 KiB).
pub const SCRAPE_MAX_BODY_BYTES: usize = 512 * 1024;

/// Maximum redirects followed while scraping.
pub const SCRAPE_MAX_REDIRECTS: usize = 10;

/// Idle pooled connections kept per scrape host.
pub const SCRAPE_POOL_IDLE_PER_HOST: usize = 20;

/// Idle pooled connection lifetime in seconds.
pub const SCRAPE_POOL_IDLE_TIMEOUT_SECS: u64 = 90;

/// Browser user-agent sent to scrape targets.
pub const SCRAPE_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
                                     AppleWebKit/537.36 (KHTML, like Gecko) \
                                     Chrome/127.0.0.0 Safari/537.36";

/// Accept header sent to scrape targets.
pub const SCRAPE_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

// =============================================================================
// HOST POLICY
// =============================================================================

/// Hosts whose own preview image is trusted as-is (substring match).
pub const PREFERRED_OG_HOSTS: &[&str] = &[
    "cosmos",
    "pinterest",
    "savee.it",
    "are.na",
    "medium",
    "spotify",
    "imdb",
];

/// Hosts known to allow iframe embedding (substring match).
pub const EMBEDDABLE_HOSTS: &[&str] = &[
    "youtube.com",
    "youtu.be",
    "vimeo.com",
    "codepen.io",
    "jsfiddle.net",
    "codesandbox.io",
    "repl.it",
    "stackblitz.com",
];

/// UI pseudo-page slugs that clients may send as a collection id. All of them
/// mean "uncategorized".
pub const UNCATEGORIZED_PAGES: &[&str] = &["uncategorized", "links", "videos", "documents", "images"];

// =============================================================================
// SERVER
// =============================================================================

/// Default HTTP server port.
pub const SERVER_PORT: u16 = 8080;

/// Default rate limit: max requests per period.
pub const RATE_LIMIT_REQUESTS: u64 = 100;

/// Default rate limit: period in seconds.
pub const RATE_LIMIT_PERIOD_SECS: u64 = 60;

/// Default CORS max-age in seconds (1 hour).
pub const CORS_MAX_AGE_SECS: u64 = 3600;

/// Overall deadline for one inbound request in seconds. Store lookups inherit
/// it; the scrape has its own shorter timeout.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum inbound request body size in bytes. Submissions are tiny JSON
/// documents.
pub const MAX_BODY_SIZE_BYTES: usize = 64 * 1024;
