//! Process-local store backed by [`DashMap`].
//!
//! Each operation holds the shard lock of the key it writes, which gives the
//! same per-key atomicity as the PostgreSQL upserts within one process.
//! State is lost on restart and is not shared between instances.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use linkhub_core::error::AppError;
use linkhub_core::result::AppResult;
use linkhub_core::types::TenantId;
use linkhub_entity::{InternalUser, SocialCredential};

use crate::store::{CredentialQuery, CredentialStore, UpsertOutcome, UserStore};

/// In-memory implementation of every store trait.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: DashMap<String, InternalUser>,
    /// Lowercased email -> user id.
    emails: DashMap<String, String>,
    credentials: DashMap<String, SocialCredential>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Number of stored credentials.
    pub fn credential_count(&self) -> usize {
        self.credentials.len()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<InternalUser>> {
        let id = self
            .emails
            .get(&email.to_lowercase())
            .map(|entry| entry.value().clone());
        Ok(id.and_then(|id| self.users.get(&id).map(|u| u.value().clone())))
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<InternalUser>> {
        Ok(self.users.get(id).map(|u| u.value().clone()))
    }

    async fn insert_or_get(&self, user: &InternalUser) -> AppResult<(InternalUser, bool)> {
        // Lock order is always users, then emails.
        match self.users.entry(user.id.clone()) {
            Entry::Occupied(existing) => Ok((existing.get().clone(), false)),
            Entry::Vacant(slot) => match self.emails.entry(user.email.to_lowercase()) {
                Entry::Occupied(_) => Err(AppError::conflict(
                    "Email already belongs to another user",
                )),
                Entry::Vacant(email_slot) => {
                    email_slot.insert(user.id.clone());
                    slot.insert(user.clone());
                    Ok((user.clone(), true))
                }
            },
        }
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn upsert(&self, credential: &SocialCredential) -> AppResult<UpsertOutcome> {
        match self.credentials.entry(credential.platform_user_id.clone()) {
            Entry::Occupied(mut existing) => {
                existing.get_mut().merge_from(credential.clone());
                Ok(UpsertOutcome::Updated(existing.get().clone()))
            }
            Entry::Vacant(slot) => {
                let stored = credential.clone().normalized();
                slot.insert(stored.clone());
                Ok(UpsertOutcome::Created(stored))
            }
        }
    }
}

#[async_trait]
impl CredentialQuery for MemoryStore {
    async fn find(&self, platform_user_id: &str) -> AppResult<Option<SocialCredential>> {
        Ok(self
            .credentials
            .get(platform_user_id)
            .map(|c| c.value().clone()))
    }

    async fn list_for_owner(
        &self,
        user_id: &str,
        tenant_id: TenantId,
    ) -> AppResult<Vec<SocialCredential>> {
        let mut owned: Vec<SocialCredential> = self
            .credentials
            .iter()
            .filter(|c| c.user_id == user_id && c.tenant_id == tenant_id)
            .map(|c| c.value().clone())
            .collect();
        owned.sort_by_key(|c| c.linked_at);
        Ok(owned)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, Utc};
    use linkhub_core::error::ErrorKind;
    use linkhub_entity::Platform;

    use super::*;

    fn user(id: &str, email: &str) -> InternalUser {
        InternalUser {
            id: id.to_string(),
            tenant_id: TenantId::generate(),
            email: email.to_string(),
            display_name: None,
            registered_at: Utc::now(),
        }
    }

    fn credential(platform_user_id: &str, owner: &InternalUser) -> SocialCredential {
        let now = Utc::now();
        SocialCredential {
            platform_user_id: platform_user_id.to_string(),
            platform: Platform::Meta,
            user_id: owner.id.clone(),
            tenant_id: owner.tenant_id,
            access_token: "access-1".to_string(),
            refresh_token: Some("refresh-1".to_string()),
            expires_at: Some(now + Duration::days(60)),
            username: Some("ann".to_string()),
            profile_picture_url: None,
            linked_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_insert_or_get_never_replaces_existing_user() {
        let store = MemoryStore::new();
        let first = user("111", "a@x.com");
        let (stored, created) = store.insert_or_get(&first).await.unwrap();
        assert!(created);
        assert_eq!(stored, first);

        let mut second = user("111", "a@x.com");
        second.display_name = Some("Other".to_string());
        let (stored, created) = store.insert_or_get(&second).await.unwrap();
        assert!(!created);
        assert_eq!(stored.tenant_id, first.tenant_id);
        assert_eq!(stored.display_name, None);
    }

    #[tokio::test]
    async fn test_email_is_unique_case_insensitively() {
        let store = MemoryStore::new();
        store.insert_or_get(&user("111", "A@X.com")).await.unwrap();

        let err = store
            .insert_or_get(&user("222", "a@x.COM"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(store.user_count(), 1);

        let found = store.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(found.id, "111");
    }

    #[tokio::test]
    async fn test_upsert_reports_created_then_updated() {
        let store = MemoryStore::new();
        let owner = user("111", "a@x.com");
        let cred = credential("111", &owner);

        assert!(store.upsert(&cred).await.unwrap().is_created());
        let outcome = store.upsert(&cred).await.unwrap();
        assert!(!outcome.is_created());
        assert_eq!(store.credential_count(), 1);
        assert_eq!(outcome.credential().access_token, "access-1");
    }

    #[tokio::test]
    async fn test_upsert_keeps_refresh_token_when_incoming_is_empty() {
        let store = MemoryStore::new();
        let owner = user("111", "a@x.com");
        store.upsert(&credential("111", &owner)).await.unwrap();

        let mut update = credential("111", &owner);
        update.access_token = "access-2".to_string();
        update.refresh_token = Some(String::new());
        update.username = None;
        let stored = store.upsert(&update).await.unwrap().into_credential();

        assert_eq!(stored.access_token, "access-2");
        assert_eq!(stored.refresh_token.as_deref(), Some("refresh-1"));
        assert_eq!(stored.username.as_deref(), Some("ann"));
    }

    #[tokio::test]
    async fn test_upsert_moves_credential_to_new_owner() {
        let store = MemoryStore::new();
        let ann = user("111", "a@x.com");
        let bob = user("999", "b@x.com");
        store.upsert(&credential("p-1", &ann)).await.unwrap();
        store.upsert(&credential("p-1", &bob)).await.unwrap();

        assert!(
            store
                .list_for_owner("111", ann.tenant_id)
                .await
                .unwrap()
                .is_empty()
        );
        let owned = store.list_for_owner("999", bob.tenant_id).await.unwrap();
        assert_eq!(owned.len(), 1);
        assert_eq!(owned[0].tenant_id, bob.tenant_id);
    }

    #[tokio::test]
    async fn test_concurrent_upserts_leave_one_row() {
        let store = Arc::new(MemoryStore::new());
        let owner = user("111", "a@x.com");

        let mut handles = Vec::new();
        for i in 0..16 {
            let store = Arc::clone(&store);
            let mut cred = credential("p-1", &owner);
            cred.access_token = format!("access-{i}");
            handles.push(tokio::spawn(async move { store.upsert(&cred).await }));
        }
        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap().unwrap().is_created() {
                created += 1;
            }
        }

        assert_eq!(created, 1);
        assert_eq!(store.credential_count(), 1);
    }
}
