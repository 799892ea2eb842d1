//! Snapchat adapter (Snap Kit login plus the Ads API `me` endpoint).

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use linkhub_core::config::ProviderCredentials;
use linkhub_core::error::{AppError, ErrorKind};
use linkhub_core::result::AppResult;
use linkhub_entity::{NormalizedProfile, Platform, RawToken};

use crate::adapter::ProviderAdapter;
use crate::http::{Endpoints, present, send_json};

const AUTHORIZE_ENDPOINT: &str = "https://accounts.snapchat.com/login/oauth2/authorize";
const TOKEN_ENDPOINT: &str = "https://accounts.snapchat.com/login/oauth2/access_token";
const PROFILE_ENDPOINT: &str = "https://adsapi.snapchat.com/v1/me";

const SCOPES: &[&str] = &[
    "snapchat-ads.manage",
    "snapchat-creative-kit.creative-kit-token",
];

const PLACEHOLDER_USERNAME: &str = "SnapchatUser";
const PLACEHOLDER_AVATAR: &str = "https://placehold.co/100x100/FFFC00/000000?text=S";

#[derive(Debug, Deserialize)]
struct SnapchatTokenResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct SnapchatMeResponse {
    me: Option<SnapchatMe>,
}

#[derive(Debug, Deserialize)]
struct SnapchatMe {
    id: Option<String>,
    display_name: Option<String>,
}

/// Snapchat adapter. Exchanges codes with a form-encoded POST.
#[derive(Debug, Clone)]
pub struct SnapchatAdapter {
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    endpoints: Endpoints,
    http: Client,
}

impl SnapchatAdapter {
    /// Create the adapter from its configuration section.
    pub fn new(credentials: &ProviderCredentials, http: Client) -> AppResult<Self> {
        Ok(Self {
            client_id: credentials.client_id.clone(),
            client_secret: credentials.client_secret.clone(),
            redirect_uri: credentials.redirect_uri.clone(),
            endpoints: Endpoints::resolve(
                credentials,
                AUTHORIZE_ENDPOINT,
                TOKEN_ENDPOINT,
                PROFILE_ENDPOINT,
            )?,
            http,
        })
    }
}

#[async_trait]
impl ProviderAdapter for SnapchatAdapter {
    fn platform(&self) -> Platform {
        Platform::Snapchat
    }

    fn scopes(&self) -> &'static [&'static str] {
        SCOPES
    }

    fn authorization_url(&self, state: &str) -> Url {
        let mut url = self.endpoints.authorize.clone();
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("scope", &SCOPES.join(" "))
            .append_pair("response_type", "code")
            .append_pair("state", state);
        url
    }

    async fn exchange_code(&self, code: &str) -> AppResult<RawToken> {
        let request = self.http.post(self.endpoints.token.clone()).form(&[
            ("grant_type", "authorization_code"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("code", code),
            ("redirect_uri", self.redirect_uri.as_str()),
        ]);
        let body: SnapchatTokenResponse = send_json(
            request,
            Platform::Snapchat,
            ErrorKind::ProviderExchange,
            "token exchange",
        )
        .await?;

        let access_token = present(body.access_token).ok_or_else(|| {
            AppError::provider_exchange("Snapchat token response has no access token")
        })?;

        Ok(RawToken {
            access_token,
            refresh_token: present(body.refresh_token),
            expires_in: body.expires_in,
            open_id: None,
            obtained_at: Utc::now(),
        })
    }

    async fn fetch_profile(&self, token: &RawToken) -> AppResult<NormalizedProfile> {
        let request = self
            .http
            .get(self.endpoints.profile.clone())
            .bearer_auth(&token.access_token);
        let body: SnapchatMeResponse = send_json(
            request,
            Platform::Snapchat,
            ErrorKind::ProviderProfile,
            "profile fetch",
        )
        .await?;

        let me = body
            .me
            .ok_or_else(|| AppError::provider_profile("Snapchat profile has no 'me' object"))?;
        let platform_user_id = present(me.id)
            .ok_or_else(|| AppError::provider_profile("Snapchat profile has no user id"))?;
        let display_name = present(me.display_name);

        // Ads API emails belong to the ads account, not a verified login identity.
        Ok(NormalizedProfile {
            platform: Platform::Snapchat,
            platform_user_id,
            email: None,
            username: Some(
                display_name
                    .clone()
                    .unwrap_or_else(|| PLACEHOLDER_USERNAME.to_string()),
            ),
            display_name,
            profile_picture_url: Some(PLACEHOLDER_AVATAR.to_string()),
            access_token: token.access_token.clone(),
            refresh_token: token.refresh_token.clone(),
            token_expires_at: token.expires_at(None),
        })
    }
}
