//! # recollect-db
//!
//! PostgreSQL storage for recollect.
//!
//! This crate provides:
//! - Connection pool management
//! - Bookmark insert and duplicate lookup
//! - Collection ownership and collaborator lookups
//! - Access token resolution
//!
//! ## Example
//!
//! ```rust,ignore
//! use recollect_db::Database;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/recollect").await?;
//!     db.migrate().await?;
//!     let owner = db.collections.owner_of(42).await?;
//!     println!("owner: {:?}", owner);
//!     Ok(())
//! }
//! ```

pub mod bookmarks;
pub mod collections;
pub mod identity;
pub mod pool;

// Always compiled so integration tests (in tests/) can use it.
pub mod test_fixtures;

pub use recollect_core::*;

pub use bookmarks::PgBookmarkRepository;
pub use collections::PgCollectionRepository;
pub use identity::PgIdentityResolver;
pub use pool::{create_pool, create_pool_with_config, PoolConfig};

/// Database handle bundling the pool with every repository.
#[derive(Clone)]
pub struct Database {
    pub pool: sqlx::Pool<sqlx::Postgres>,
    pub bookmarks: PgBookmarkRepository,
    pub collections: PgCollectionRepository,
    pub identity: PgIdentityResolver,
}

impl Database {
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            bookmarks: PgBookmarkRepository::new(pool.clone()),
            collections: PgCollectionRepository::new(pool.clone()),
            identity: PgIdentityResolver::new(pool.clone()),
            pool,
        }
    }

    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations from the workspace `migrations/` directory.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}
