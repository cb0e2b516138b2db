//! Bookmark repository implementation.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{Pool, Postgres, Row};
use tracing::debug;

use recollect_core::{
    BookmarkRecord, BookmarkRepository, Error, MediaDescriptor, NewBookmark, Result,
};

const RETURNING_COLUMNS: &str = r#"id, url, title, description, "ogImage", category_id, user_id,
    meta_data, type, trash, inserted_at"#;

/// PostgreSQL implementation of BookmarkRepository.
#[derive(Clone)]
pub struct PgBookmarkRepository {
    pool: Pool<Postgres>,
}

impl PgBookmarkRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn row_to_record(row: &PgRow) -> Result<BookmarkRecord> {
    let meta_data: Json<MediaDescriptor> = row.try_get("meta_data")?;
    Ok(BookmarkRecord {
        id: row.try_get("id")?,
        url: row.try_get("url")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        og_image: row.try_get("ogImage")?,
        category_id: row.try_get("category_id")?,
        user_id: row.try_get("user_id")?,
        meta_data: meta_data.0,
        record_type: row.try_get("type")?,
        trash: row.try_get("trash")?,
        inserted_at: row.try_get("inserted_at")?,
    })
}

#[async_trait]
impl BookmarkRepository for PgBookmarkRepository {
    async fn exists_in_collection(&self, url: &str, collection_id: i64) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(
                SELECT 1 FROM bookmarks_table
                WHERE url = $1 AND category_id = $2 AND trash = FALSE
             )",
        )
        .bind(url)
        .bind(collection_id)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        debug!(
            subsystem = "db",
            component = "bookmarks",
            op = "exists_in_collection",
            collection_id,
            exists,
            "Duplicate lookup"
        );
        Ok(exists)
    }

    async fn insert_returning(&self, bookmark: NewBookmark) -> Result<Vec<BookmarkRecord>> {
        let sql = format!(
            r#"INSERT INTO bookmarks_table
                (url, title, description, "ogImage", category_id, user_id, meta_data, type, trash)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
               RETURNING {}"#,
            RETURNING_COLUMNS
        );

        let rows = sqlx::query(&sql)
            .bind(&bookmark.url)
            .bind(&bookmark.title)
            .bind(&bookmark.description)
            .bind(&bookmark.og_image)
            .bind(bookmark.category_id)
            .bind(bookmark.user_id)
            .bind(Json(&bookmark.meta_data))
            .bind(&bookmark.record_type)
            .bind(bookmark.trash)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        rows.iter().map(row_to_record).collect()
    }
}
