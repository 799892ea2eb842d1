//! Account service operations exposed over HTTP.

use std::sync::Arc;

use tracing::info;

use linkhub_auth::VerifiedIdentity;
use linkhub_core::error::AppError;
use linkhub_core::result::AppResult;
use linkhub_database::{CredentialQuery, CredentialStore, UpsertOutcome};
use linkhub_entity::SocialCredential;

/// Create-or-update and listing of linked credentials.
#[derive(Clone)]
pub struct AccountService {
    credentials: Arc<dyn CredentialStore>,
    /// Absent when credentials live in a remote account service.
    query: Option<Arc<dyn CredentialQuery>>,
}

impl std::fmt::Debug for AccountService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountService")
            .field("can_list", &self.query.is_some())
            .finish_non_exhaustive()
    }
}

impl AccountService {
    /// Creates the service.
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        query: Option<Arc<dyn CredentialQuery>>,
    ) -> Self {
        Self { credentials, query }
    }

    /// Create or update a credential submitted by another service.
    pub async fn upsert(&self, credential: SocialCredential) -> AppResult<UpsertOutcome> {
        if credential.platform_user_id.trim().is_empty() {
            return Err(AppError::validation("platformUserId must not be empty"));
        }
        if credential.user_id.trim().is_empty() {
            return Err(AppError::validation("userId must not be empty"));
        }
        if credential.access_token.is_empty() {
            return Err(AppError::validation("accessToken must not be empty"));
        }

        let outcome = self.credentials.upsert(&credential).await?;
        info!(
            platform = %credential.platform,
            platform_user_id = %credential.platform_user_id,
            created = outcome.is_created(),
            "Account upserted"
        );
        Ok(outcome)
    }

    /// Credentials owned by the caller, oldest link first.
    pub async fn list_for(&self, identity: &VerifiedIdentity) -> AppResult<Vec<SocialCredential>> {
        let query = self.query.as_ref().ok_or_else(|| {
            AppError::service_unavailable("Linked accounts are held by the remote account service")
        })?;
        query
            .list_for_owner(&identity.user_id, identity.tenant_id)
            .await
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use linkhub_core::error::ErrorKind;
    use linkhub_core::types::TenantId;
    use linkhub_database::memory::MemoryStore;
    use linkhub_entity::Platform;

    use super::*;

    fn credential(id: &str, user_id: &str, tenant_id: TenantId) -> SocialCredential {
        let now = Utc::now();
        SocialCredential {
            platform_user_id: id.to_string(),
            platform: Platform::Meta,
            user_id: user_id.to_string(),
            tenant_id,
            access_token: "access".to_string(),
            refresh_token: None,
            expires_at: None,
            username: None,
            profile_picture_url: None,
            linked_at: now,
            updated_at: now,
        }
    }

    fn service() -> AccountService {
        let store = Arc::new(MemoryStore::new());
        AccountService::new(store.clone(), Some(store))
    }

    #[tokio::test]
    async fn test_list_is_scoped_to_user_and_tenant() {
        let service = service();
        let tenant = TenantId::generate();
        service.upsert(credential("p-1", "111", tenant)).await.unwrap();
        service.upsert(credential("p-2", "111", tenant)).await.unwrap();
        service
            .upsert(credential("p-3", "111", TenantId::generate()))
            .await
            .unwrap();
        service.upsert(credential("p-4", "999", tenant)).await.unwrap();

        let identity = VerifiedIdentity {
            user_id: "111".to_string(),
            tenant_id: tenant,
        };
        let owned = service.list_for(&identity).await.unwrap();
        let ids: Vec<&str> = owned.iter().map(|c| c.platform_user_id.as_str()).collect();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&"p-1") && ids.contains(&"p-2"));
    }

    #[tokio::test]
    async fn test_upsert_rejects_blank_keys() {
        let service = service();
        let err = service
            .upsert(credential(" ", "111", TenantId::generate()))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let mut no_token = credential("p-1", "111", TenantId::generate());
        no_token.access_token.clear();
        assert!(service.upsert(no_token).await.is_err());
    }

    #[tokio::test]
    async fn test_list_without_query_store_is_unavailable() {
        let store = Arc::new(MemoryStore::new());
        let service = AccountService::new(store, None);
        let identity = VerifiedIdentity {
            user_id: "111".to_string(),
            tenant_id: TenantId::generate(),
        };
        let err = service.list_for(&identity).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::ServiceUnavailable);
    }
}
