//! Store abstractions consumed by the identity resolver and account linker.
//!
//! Implementations must make [`UserStore::insert_or_get`] and
//! [`CredentialStore::upsert`] atomic per key. Concurrent callbacks rely on
//! that rather than on any in-process lock.

use async_trait::async_trait;

use linkhub_core::result::AppResult;
use linkhub_core::types::TenantId;
use linkhub_entity::{InternalUser, SocialCredential};

/// Result of a credential create-or-update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No row existed for the platform user id.
    Created(SocialCredential),
    /// An existing row was updated.
    Updated(SocialCredential),
}

impl UpsertOutcome {
    /// Whether the row was newly created.
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }

    /// The stored row.
    pub fn credential(&self) -> &SocialCredential {
        match self {
            Self::Created(c) | Self::Updated(c) => c,
        }
    }

    /// Consume the outcome, returning the stored row.
    pub fn into_credential(self) -> SocialCredential {
        match self {
            Self::Created(c) | Self::Updated(c) => c,
        }
    }
}

/// Persistence of internal users.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find a user by email, case-insensitively.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<InternalUser>>;

    /// Find a user by id.
    async fn find_by_id(&self, id: &str) -> AppResult<Option<InternalUser>>;

    /// Insert `user` unless a row with its id exists.
    ///
    /// Returns the stored row and whether this call inserted it. An existing
    /// row is returned untouched, so a tenant id is never overwritten. Fails
    /// with `Conflict` when another user already owns the email.
    async fn insert_or_get(&self, user: &InternalUser) -> AppResult<(InternalUser, bool)>;

    /// Check that the store is reachable.
    async fn ping(&self) -> AppResult<()>;
}

/// Create-or-update of social credentials, keyed by platform user id.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Insert the credential, or update the existing row without replacing
    /// stored optional values with empty ones.
    async fn upsert(&self, credential: &SocialCredential) -> AppResult<UpsertOutcome>;
}

/// Read access to linked credentials.
#[async_trait]
pub trait CredentialQuery: Send + Sync {
    /// Find the credential for a platform user id.
    async fn find(&self, platform_user_id: &str) -> AppResult<Option<SocialCredential>>;

    /// All credentials owned by `user_id` within `tenant_id`.
    async fn list_for_owner(
        &self,
        user_id: &str,
        tenant_id: TenantId,
    ) -> AppResult<Vec<SocialCredential>>;
}
