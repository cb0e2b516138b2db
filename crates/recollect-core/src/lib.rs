//! # recollect-core
//!
//! Core types, traits, and classification rules for recollect bookmark
//! ingestion.
//!
//! This crate holds everything the ingestion pipeline decides without I/O:
//! submission validation, collection normalization, media classification and
//! preview preference. Storage, identity and scraping are reached through the
//! traits in [`traits`].

pub mod defaults;
pub mod error;
pub mod media;
pub mod models;
pub mod preference;
pub mod traits;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use media::{classify, is_direct_media, MediaType};
pub use models::*;
pub use preference::{HostPolicy, PreviewDecision};
pub use traits::*;
