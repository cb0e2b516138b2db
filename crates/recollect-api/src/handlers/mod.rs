//! HTTP handlers for recollect-api.

pub mod bookmarks;
pub mod health;

pub use bookmarks::add_bookmark_min_data;
pub use health::health_check;
