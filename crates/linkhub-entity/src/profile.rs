//! Ephemeral values produced by provider adapters.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::platform::Platform;

/// A provider token response reduced to the fields LinkHub uses.
#[derive(Clone, Serialize, Deserialize)]
pub struct RawToken {
    /// Bearer token for the provider API.
    pub access_token: String,
    /// Refresh token, when issued.
    pub refresh_token: Option<String>,
    /// Lifetime in seconds as reported by the provider.
    pub expires_in: Option<i64>,
    /// User identifier carried in the token response (TikTok `open_id`).
    pub open_id: Option<String>,
    /// When the token response was received.
    pub obtained_at: DateTime<Utc>,
}

impl RawToken {
    /// Absolute expiry, falling back to `default_lifetime` when the provider
    /// reported none.
    pub fn expires_at(&self, default_lifetime: Option<Duration>) -> Option<DateTime<Utc>> {
        match self.expires_in.filter(|secs| *secs > 0) {
            Some(secs) => Some(self.obtained_at + Duration::seconds(secs)),
            None => default_lifetime.map(|lifetime| self.obtained_at + lifetime),
        }
    }
}

impl std::fmt::Debug for RawToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawToken")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("expires_in", &self.expires_in)
            .field("open_id", &self.open_id)
            .field("obtained_at", &self.obtained_at)
            .finish_non_exhaustive()
    }
}

/// A platform profile in the common shape consumed by the identity resolver.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedProfile {
    /// Platform the profile came from.
    pub platform: Platform,
    /// Identifier of the account on the platform.
    pub platform_user_id: String,
    /// Provider-vouched email, if any.
    pub email: Option<String>,
    /// Display name.
    pub display_name: Option<String>,
    /// Handle on the platform.
    pub username: Option<String>,
    /// Avatar URL.
    pub profile_picture_url: Option<String>,
    /// Provider access token.
    pub access_token: String,
    /// Provider refresh token.
    pub refresh_token: Option<String>,
    /// Access token expiry.
    pub token_expires_at: Option<DateTime<Utc>>,
}

impl NormalizedProfile {
    /// The email used to correlate logins: trimmed, `None` when blank.
    pub fn email_key(&self) -> Option<&str> {
        self.email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }
}

impl std::fmt::Debug for NormalizedProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NormalizedProfile")
            .field("platform", &self.platform)
            .field("platform_user_id", &self.platform_user_id)
            .field("email", &self.email)
            .field("display_name", &self.display_name)
            .field("username", &self.username)
            .field("token_expires_at", &self.token_expires_at)
            .finish_non_exhaustive()
    }
}
