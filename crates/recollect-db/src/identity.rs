//! Access token resolution.
//!
//! Tokens are never stored in clear: `access_tokens.token_hash` holds the
//! lowercase hex SHA-256 digest and lookups hash the presented token first.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use sqlx::{Pool, Postgres, Row};
use tracing::debug;
use uuid::Uuid;

use recollect_core::{Error, Identity, IdentityResolver, Result};

/// PostgreSQL implementation of IdentityResolver.
#[derive(Clone)]
pub struct PgIdentityResolver {
    pool: Pool<Postgres>,
}

impl PgIdentityResolver {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Hash a token using SHA256.
    pub fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Register a token for an existing profile.
    pub async fn store_token(
        &self,
        user_id: Uuid,
        token: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<()> {
        sqlx::query(
            "INSERT INTO access_tokens (token_hash, user_id, expires_at)
             VALUES ($1, $2, $3)",
        )
        .bind(Self::hash_token(token))
        .bind(user_id)
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(())
    }

    /// Revoke a token. Returns false if the token was unknown.
    pub async fn revoke_token(&self, token: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE access_tokens SET revoked = TRUE WHERE token_hash = $1")
            .bind(Self::hash_token(token))
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl IdentityResolver for PgIdentityResolver {
    async fn resolve(&self, access_token: &str) -> Result<Option<Identity>> {
        let token = access_token.trim();
        if token.is_empty() {
            return Ok(None);
        }

        let row = sqlx::query(
            "SELECT p.id, p.email
             FROM access_tokens t
             JOIN profiles p ON p.id = t.user_id
             WHERE t.token_hash = $1
               AND t.revoked = FALSE
               AND (t.expires_at IS NULL OR t.expires_at > now())",
        )
        .bind(Self::hash_token(token))
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        let Some(row) = row else {
            debug!(
                subsystem = "db",
                component = "identity",
                op = "resolve",
                "Token not found, expired or revoked"
            );
            return Ok(None);
        };

        Ok(Some(Identity {
            user_id: row.try_get("id")?,
            email: row.try_get("email")?,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_token_is_hex_sha256() {
        let hash = PgIdentityResolver::hash_token("secret");
        assert_eq!(hash.len(), 64);
        assert_eq!(
            hash,
            "2bb80d537b1da3e38bd30361aa855686bde0eacd7162fef6a25fe97bf527a25b"
        );
    }

    #[test]
    fn test_hash_token_is_deterministic() {
        assert_eq!(
            PgIdentityResolver::hash_token("abc"),
            PgIdentityResolver::hash_token("abc")
        );
        assert_ne!(
            PgIdentityResolver::hash_token("abc"),
            PgIdentityResolver::hash_token("abd")
        );
    }
}
