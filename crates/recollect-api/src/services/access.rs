//! Collection write authorization.

use std::sync::Arc;

use tracing::debug;

use recollect_core::{
    CollectionAccessRepository, CollectionAuthorization, Error, Identity, Result,
};

/// Decides whether an identity may add records to a collection.
///
/// Owner first, then collaborator edit access. Lookup failures surface as
/// [`Error::Lookup`] and are never read as "not authorized".
#[derive(Clone)]
pub struct AccessService {
    collections: Arc<dyn CollectionAccessRepository>,
}

impl AccessService {
    pub fn new(collections: Arc<dyn CollectionAccessRepository>) -> Self {
        Self { collections }
    }

    pub async fn authorize(
        &self,
        collection_id: i64,
        identity: &Identity,
    ) -> Result<CollectionAuthorization> {
        let owner = self
            .collections
            .owner_of(collection_id)
            .await
            .map_err(as_lookup)?;

        if owner == Some(identity.user_id) {
            return Ok(CollectionAuthorization {
                is_owner: true,
                has_edit_access: false,
            });
        }

        let has_edit_access = self
            .collections
            .collaborator_edit_access(collection_id, &identity.email)
            .await
            .map_err(as_lookup)?
            .unwrap_or(false);

        debug!(
            subsystem = "ingest",
            component = "access",
            op = "authorize",
            collection_id,
            has_edit_access,
            "Collaborator access checked"
        );

        Ok(CollectionAuthorization {
            is_owner: false,
            has_edit_access,
        })
    }

    pub async fn can_write(&self, collection_id: i64, identity: &Identity) -> Result<bool> {
        Ok(self.authorize(collection_id, identity).await?.allows_write())
    }
}

/// Normalize store errors from a read path to `Error::Lookup`.
pub(crate) fn as_lookup(err: Error) -> Error {
    match err {
        Error::Lookup(_) => err,
        other => Error::Lookup(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recollect_core::mock::MockCollectionRepository;
    use uuid::Uuid;

    fn identity() -> Identity {
        Identity {
            user_id: Uuid::new_v4(),
            email: "me@example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn test_owner_short_circuits_collaborator_lookup() {
        let me = identity();
        let repo = MockCollectionRepository::new().with_owner(1, me.user_id);
        let service = AccessService::new(Arc::new(repo.clone()));

        let auth = service.authorize(1, &me).await.unwrap();
        assert!(auth.is_owner);
        assert!(auth.allows_write());
        assert_eq!(repo.call_count(), 1);
    }

    #[tokio::test]
    async fn test_collaborator_with_edit_access() {
        let me = identity();
        let repo = MockCollectionRepository::new()
            .with_owner(1, Uuid::new_v4())
            .with_collaborator(1, &me.email, true);
        let service = AccessService::new(Arc::new(repo));

        assert!(service.can_write(1, &me).await.unwrap());
    }

    #[tokio::test]
    async fn test_read_only_collaborator_denied() {
        let me = identity();
        let repo = MockCollectionRepository::new()
            .with_owner(1, Uuid::new_v4())
            .with_collaborator(1, &me.email, false);
        let service = AccessService::new(Arc::new(repo));

        assert!(!service.can_write(1, &me).await.unwrap());
    }

    #[tokio::test]
    async fn test_stranger_denied_even_for_missing_collection() {
        let service = AccessService::new(Arc::new(MockCollectionRepository::new()));
        assert!(!service.can_write(99, &identity()).await.unwrap());
    }

    #[tokio::test]
    async fn test_lookup_failure_is_error_not_denial() {
        let service = AccessService::new(Arc::new(MockCollectionRepository::new().failing()));
        let err = service.can_write(1, &identity()).await.unwrap_err();
        assert!(matches!(err, Error::Lookup(_)));
    }

    #[test]
    fn test_as_lookup_wraps_other_errors() {
        assert!(matches!(
            as_lookup(Error::Internal("boom".into())),
            Error::Lookup(msg) if msg.contains("boom")
        ));
    }
}
