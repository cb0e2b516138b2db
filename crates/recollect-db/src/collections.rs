//! Collection ownership and collaborator lookups.

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use recollect_core::{CollectionAccessRepository, Error, Result};

/// PostgreSQL implementation of CollectionAccessRepository.
#[derive(Clone)]
pub struct PgCollectionRepository {
    pool: Pool<Postgres>,
}

impl PgCollectionRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CollectionAccessRepository for PgCollectionRepository {
    async fn owner_of(&self, collection_id: i64) -> Result<Option<Uuid>> {
        sqlx::query_scalar("SELECT user_id FROM categories WHERE id = $1")
            .bind(collection_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)
    }

    async fn collaborator_edit_access(
        &self,
        collection_id: i64,
        email: &str,
    ) -> Result<Option<bool>> {
        sqlx::query_scalar(
            "SELECT edit_access FROM shared_categories
             WHERE category_id = $1 AND email = $2
             LIMIT 1",
        )
        .bind(collection_id)
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)
    }
}
