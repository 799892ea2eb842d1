//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use linkhub_entity::{Platform, SocialCredential};

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// A linked account as shown to its owner. Carries no provider tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedAccountResponse {
    pub platform: Platform,
    pub platform_user_id: String,
    pub username: Option<String>,
    #[serde(rename = "profilePic")]
    pub profile_picture_url: Option<String>,
    /// Provider token expiry.
    pub expires_at: Option<DateTime<Utc>>,
    pub linked_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SocialCredential> for LinkedAccountResponse {
    fn from(c: SocialCredential) -> Self {
        Self {
            platform: c.platform,
            platform_user_id: c.platform_user_id,
            username: c.username,
            profile_picture_url: c.profile_picture_url,
            expires_at: c.expires_at,
            linked_at: c.linked_at,
            updated_at: c.updated_at,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Store reachability.
    pub store: String,
    /// Platforms with an enabled adapter.
    pub platforms: Vec<Platform>,
}
