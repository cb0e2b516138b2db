//! Service layer for business logic.

pub mod access;
pub mod ingest;

pub use access::AccessService;
pub use ingest::IngestService;
