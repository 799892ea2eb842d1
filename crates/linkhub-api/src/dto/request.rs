//! Request DTOs with validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use linkhub_core::types::TenantId;
use linkhub_entity::{Platform, SocialCredential};

/// Body of `POST /accounts`, in the account service wire format.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpsertAccountRequest {
    /// Identifier of the account on the platform.
    #[validate(length(min = 1, max = 255, message = "platformUserId is required"))]
    pub platform_user_id: String,
    /// Platform of the account.
    pub platform: Platform,
    /// Owning internal user.
    #[validate(length(min = 1, max = 255, message = "userId is required"))]
    pub user_id: String,
    /// Tenant of the owner.
    pub tenant_id: TenantId,
    /// Provider access token.
    #[validate(length(min = 1, message = "accessToken is required"))]
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    #[validate(length(max = 255))]
    pub username: Option<String>,
    /// Avatar URL.
    #[serde(rename = "profilePic", alias = "profilePictureUrl")]
    #[validate(url(message = "profilePic must be a URL"))]
    pub profile_picture_url: Option<String>,
    /// First link time; defaults to now.
    pub linked_at: Option<DateTime<Utc>>,
}

impl UpsertAccountRequest {
    /// Credential row for this request, stamped at `now`.
    pub fn into_credential(self, now: DateTime<Utc>) -> SocialCredential {
        SocialCredential {
            platform_user_id: self.platform_user_id,
            platform: self.platform,
            user_id: self.user_id,
            tenant_id: self.tenant_id,
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at: self.expires_at,
            username: self.username,
            profile_picture_url: self.profile_picture_url,
            linked_at: self.linked_at.unwrap_or(now),
            updated_at: now,
        }
    }
}
