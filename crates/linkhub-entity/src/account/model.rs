//! Social credential entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use linkhub_core::types::TenantId;

use crate::platform::Platform;
use crate::profile::NormalizedProfile;
use crate::user::InternalUser;

/// A platform credential linked to an internal user.
///
/// Exactly one row exists per `platform_user_id`. The JSON shape is the
/// account service wire format, hence camelCase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SocialCredential {
    /// Identifier of the account on the platform. Primary key.
    pub platform_user_id: String,
    /// Platform the account belongs to.
    pub platform: Platform,
    /// Owning internal user.
    pub user_id: String,
    /// Tenant of the owning user.
    pub tenant_id: TenantId,
    /// Provider access token.
    pub access_token: String,
    /// Provider refresh token, when the provider issues one.
    pub refresh_token: Option<String>,
    /// Access token expiry.
    pub expires_at: Option<DateTime<Utc>>,
    /// Handle on the platform.
    pub username: Option<String>,
    /// Avatar URL.
    #[serde(rename = "profilePic", alias = "profilePictureUrl")]
    #[sqlx(rename = "profile_pic")]
    pub profile_picture_url: Option<String>,
    /// When the account was first linked.
    pub linked_at: DateTime<Utc>,
    /// When the row was last written.
    pub updated_at: DateTime<Utc>,
}

impl SocialCredential {
    /// Credential row linking `profile` to `user`, stamped at `now`.
    pub fn link(user: &InternalUser, profile: &NormalizedProfile, now: DateTime<Utc>) -> Self {
        Self {
            platform_user_id: profile.platform_user_id.clone(),
            platform: profile.platform,
            user_id: user.id.clone(),
            tenant_id: user.tenant_id,
            access_token: profile.access_token.clone(),
            refresh_token: non_empty(profile.refresh_token.as_deref()),
            expires_at: profile.token_expires_at,
            username: non_empty(profile.username.as_deref())
                .or_else(|| non_empty(profile.display_name.as_deref())),
            profile_picture_url: non_empty(profile.profile_picture_url.as_deref()),
            linked_at: now,
            updated_at: now,
        }
    }

    /// Apply an update from `incoming` without clobbering stored values
    /// with empty ones. Identity, owner and access token always move to the
    /// incoming values; `platform` and `linked_at` never change.
    pub fn merge_from(&mut self, incoming: SocialCredential) {
        self.user_id = incoming.user_id;
        self.tenant_id = incoming.tenant_id;
        self.access_token = incoming.access_token;
        if let Some(token) = non_empty(incoming.refresh_token.as_deref()) {
            self.refresh_token = Some(token);
        }
        if incoming.expires_at.is_some() {
            self.expires_at = incoming.expires_at;
        }
        if let Some(username) = non_empty(incoming.username.as_deref()) {
            self.username = Some(username);
        }
        if let Some(url) = non_empty(incoming.profile_picture_url.as_deref()) {
            self.profile_picture_url = Some(url);
        }
        self.updated_at = incoming.updated_at;
    }

    /// Replace blank optional strings with `None`.
    pub fn normalized(mut self) -> Self {
        self.refresh_token = non_empty(self.refresh_token.as_deref());
        self.username = non_empty(self.username.as_deref());
        self.profile_picture_url = non_empty(self.profile_picture_url.as_deref());
        self
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
