//! # recollect-scrape
//!
//! Best-effort page metadata for bookmark previews.
//!
//! [`HttpPageScraper`] fetches a page with a hard deadline and a body cap, then
//! [`extract_metadata`] pulls the Open Graph title, description and image plus
//! the favicon out of the document head.

pub mod client;
pub mod extract;

pub use client::{HttpPageScraper, ScraperConfig};
pub use extract::extract_metadata;
