//! Internal user entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use linkhub_core::types::TenantId;

use crate::platform::Platform;
use crate::profile::NormalizedProfile;

/// A person known to LinkHub, scoped to exactly one tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct InternalUser {
    /// Stable identifier; the platform user id seen at first registration.
    pub id: String,
    /// Tenant the user belongs to. Never changes after creation.
    pub tenant_id: TenantId,
    /// Resolution key for returning users. Synthetic when the provider gave none.
    pub email: String,
    /// Human-readable display name.
    pub display_name: Option<String>,
    /// When the user was first registered.
    pub registered_at: DateTime<Utc>,
}

impl InternalUser {
    /// Build a first-sight user for `profile` under a freshly minted tenant.
    pub fn register(profile: &NormalizedProfile, now: DateTime<Utc>) -> Self {
        let email = profile
            .email_key()
            .map(str::to_string)
            .unwrap_or_else(|| synthetic_email(profile.platform, &profile.platform_user_id));

        Self {
            id: profile.platform_user_id.clone(),
            tenant_id: TenantId::generate(),
            email,
            display_name: profile.display_name.clone(),
            registered_at: now,
        }
    }
}

/// Placeholder address for identities whose provider returned no email.
///
/// Synthetic addresses are unique per platform identity, so they never
/// match another person's login.
pub fn synthetic_email(platform: Platform, platform_user_id: &str) -> String {
    format!("{platform_user_id}@{}", platform.as_str())
}
