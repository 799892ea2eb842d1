//! Links a platform credential to a resolved user.

use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use linkhub_core::result::AppResult;
use linkhub_database::{CredentialStore, UpsertOutcome};
use linkhub_entity::{InternalUser, NormalizedProfile, SocialCredential};

/// Idempotent create-or-update of the credential row for a profile.
#[derive(Clone)]
pub struct AccountLinker {
    credentials: Arc<dyn CredentialStore>,
}

impl std::fmt::Debug for AccountLinker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountLinker").finish_non_exhaustive()
    }
}

impl AccountLinker {
    /// Creates a linker over the credential store.
    pub fn new(credentials: Arc<dyn CredentialStore>) -> Self {
        Self { credentials }
    }

    /// Upsert the credential for `profile` under `user`.
    ///
    /// The row is keyed by platform user id. On update the owner and access
    /// token always move to the new values, while stored optional values are
    /// only replaced by non-empty ones.
    pub async fn link(
        &self,
        user: &InternalUser,
        profile: &NormalizedProfile,
    ) -> AppResult<UpsertOutcome> {
        let credential = SocialCredential::link(user, profile, Utc::now());
        let outcome = self.credentials.upsert(&credential).await?;

        debug!(
            platform = %credential.platform,
            platform_user_id = %credential.platform_user_id,
            user_id = %user.id,
            created = outcome.is_created(),
            "Credential linked"
        );
        Ok(outcome)
    }
}
