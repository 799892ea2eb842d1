//! OAuth provider client configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Per-platform OAuth client settings.
///
/// A platform whose section is absent is disabled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    /// Timeout applied to every outbound provider request, in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Meta (Facebook / Instagram).
    #[serde(default)]
    pub meta: Option<ProviderCredentials>,
    /// TikTok.
    #[serde(default)]
    pub tiktok: Option<ProviderCredentials>,
    /// Snapchat.
    #[serde(default)]
    pub snapchat: Option<ProviderCredentials>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            meta: None,
            tiktok: None,
            snapchat: None,
        }
    }
}

/// Client credentials and optional endpoint overrides for one platform.
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderCredentials {
    /// OAuth client id (`client_key` on TikTok).
    pub client_id: String,
    /// OAuth client secret.
    #[serde(skip_serializing)]
    pub client_secret: String,
    /// Callback URL registered with the provider.
    pub redirect_uri: String,
    /// Override of the authorization dialog URL.
    #[serde(default)]
    pub authorize_url: Option<String>,
    /// Override of the token endpoint.
    #[serde(default)]
    pub token_url: Option<String>,
    /// Override of the profile endpoint.
    #[serde(default)]
    pub profile_url: Option<String>,
}

impl fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_uri", &self.redirect_uri)
            .field("authorize_url", &self.authorize_url)
            .field("token_url", &self.token_url)
            .field("profile_url", &self.profile_url)
            .finish()
    }
}

fn default_timeout() -> u64 {
    5
}
