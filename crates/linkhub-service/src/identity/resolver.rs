//! Maps a platform profile onto an internal user and tenant.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use linkhub_core::error::{AppError, ErrorKind};
use linkhub_core::result::AppResult;
use linkhub_database::UserStore;
use linkhub_entity::{InternalUser, NormalizedProfile};

/// Decides whether a profile belongs to a returning person.
///
/// A provider-supplied email is the only cross-platform correlation key.
/// Without one, each distinct platform identity gets its own tenant.
#[derive(Clone)]
pub struct IdentityResolver {
    users: Arc<dyn UserStore>,
}

impl std::fmt::Debug for IdentityResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityResolver").finish_non_exhaustive()
    }
}

impl IdentityResolver {
    /// Creates a resolver over the user store.
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Resolve `profile` to `(user, is_new_user)`.
    ///
    /// An existing user is returned unchanged. A new user is written with a
    /// single insert-or-get, so a concurrent first login for the same
    /// identity ends on one row and one tenant.
    pub async fn resolve(&self, profile: &NormalizedProfile) -> AppResult<(InternalUser, bool)> {
        let email = profile.email_key();

        if let Some(email) = email {
            if let Some(existing) = self.users.find_by_email(email).await? {
                debug!(
                    platform = %profile.platform,
                    user_id = %existing.id,
                    "Profile email matches existing user"
                );
                return Ok((existing, false));
            }
        }

        let candidate = InternalUser::register(profile, Utc::now());
        match self.users.insert_or_get(&candidate).await {
            Ok((user, created)) => {
                if created {
                    info!(
                        platform = %profile.platform,
                        user_id = %user.id,
                        tenant_id = %user.tenant_id,
                        "Registered new user"
                    );
                }
                Ok((user, created))
            }
            // Another callback registered the same email between our lookup
            // and insert.
            Err(e) if e.is(ErrorKind::Conflict) => {
                let Some(email) = email else {
                    return Err(AppError::storage(
                        "Synthetic email collides with an existing user",
                    ));
                };
                self.users
                    .find_by_email(email)
                    .await?
                    .map(|user| (user, false))
                    .ok_or_else(|| AppError::storage("User vanished after email conflict"))
            }
            Err(e) => Err(e),
        }
    }
}
