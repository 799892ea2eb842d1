//! TikTok adapter.
//!
//! TikTok names the client id `client_key`, exchanges codes with a JSON POST,
//! and identifies the user by `open_id` in the token response. Its token
//! endpoint answers either flat or wrapped in `data`.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use url::Url;

use linkhub_core::config::ProviderCredentials;
use linkhub_core::error::{AppError, ErrorKind};
use linkhub_core::result::AppResult;
use linkhub_entity::{NormalizedProfile, Platform, RawToken};

use crate::adapter::ProviderAdapter;
use crate::http::{Endpoints, present, send_json};

const AUTHORIZE_ENDPOINT: &str = "https://www.tiktok.com/v2/auth/authorize";
const TOKEN_ENDPOINT: &str = "https://open-api.tiktok.com/oauth/access_token/";
const PROFILE_ENDPOINT: &str = "https://open.tiktokapis.com/v2/user/info/";

const SCOPES: &[&str] = &["user.info.basic", "video.list", "video.upload"];
const PROFILE_FIELDS: &str = "open_id,avatar_url,display_name";

const PLACEHOLDER_USERNAME: &str = "TikTokUser";
const PLACEHOLDER_AVATAR: &str = "https://placehold.co/100x100/FF0050/FFFFFF?text=T";

#[derive(Debug, Default, Deserialize)]
struct TikTokTokenFields {
    access_token: Option<String>,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
    open_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TikTokTokenResponse {
    #[serde(flatten)]
    top: TikTokTokenFields,
    data: Option<TikTokTokenFields>,
}

impl TikTokTokenResponse {
    /// Prefer the `data` envelope when it carries a token.
    fn into_fields(self) -> TikTokTokenFields {
        match self.data {
            Some(data) if data.access_token.is_some() => data,
            _ => self.top,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TikTokUserInfoResponse {
    data: Option<TikTokUserData>,
}

#[derive(Debug, Deserialize)]
struct TikTokUserData {
    user: Option<TikTokUser>,
}

#[derive(Debug, Deserialize)]
struct TikTokUser {
    open_id: Option<String>,
    display_name: Option<String>,
    avatar_url: Option<String>,
}

/// TikTok adapter.
#[derive(Debug, Clone)]
pub struct TikTokAdapter {
    client_key: String,
    client_secret: String,
    redirect_uri: String,
    endpoints: Endpoints,
    http: Client,
}

impl TikTokAdapter {
    /// Create the adapter from its configuration section.
    pub fn new(credentials: &ProviderCredentials, http: Client) -> AppResult<Self> {
        Ok(Self {
            client_key: credentials.client_id.clone(),
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
impl ProviderAdapter for TikTokAdapter {
    fn platform(&self) -> Platform {
        Platform::TikTok
    }

    fn scopes(&self) -> &'static [&'static str] {
        SCOPES
    }

    fn authorization_url(&self, state: &str) -> Url {
        let mut url = self.endpoints.authorize.clone();
        url.query_pairs_mut()
            .append_pair("client_key", &self.client_key)
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("scope", &SCOPES.join(","))
            .append_pair("response_type", "code")
            .append_pair("state", state);
        url
    }

    async fn exchange_code(&self, code: &str) -> AppResult<RawToken> {
        let request = self.http.post(self.endpoints.token.clone()).json(&json!({
            "client_key": self.client_key,
            "client_secret": self.client_secret,
            "code": code,
            "grant_type": "authorization_code",
        }));
        let body: TikTokTokenResponse =
            send_json(request, Platform::TikTok, ErrorKind::ProviderExchange, "token exchange")
                .await?;
        let fields = body.into_fields();

        let access_token = present(fields.access_token).ok_or_else(|| {
            AppError::provider_exchange("TikTok token response has no access token")
        })?;

        Ok(RawToken {
            access_token,
            refresh_token: present(fields.refresh_token),
            expires_in: fields.expires_in,
            open_id: present(fields.open_id),
            obtained_at: Utc::now(),
        })
    }

    async fn fetch_profile(&self, token: &RawToken) -> AppResult<NormalizedProfile> {
        let request = self
            .http
            .get(self.endpoints.profile.clone())
            .query(&[("fields", PROFILE_FIELDS)])
            .bearer_auth(&token.access_token);
        let body: TikTokUserInfoResponse =
            send_json(request, Platform::TikTok, ErrorKind::ProviderProfile, "profile fetch")
                .await?;

        let user = body.data.and_then(|d| d.user);
        let (open_id, display_name, avatar) = match user {
            Some(u) => (present(u.open_id), present(u.display_name), present(u.avatar_url)),
            None => (None, None, None),
        };

        let platform_user_id = open_id
            .or_else(|| token.open_id.clone())
            .ok_or_else(|| AppError::provider_profile("TikTok returned no open_id"))?;

        Ok(NormalizedProfile {
            platform: Platform::TikTok,
            platform_user_id,
            email: None,
            username: Some(
                display_name
                    .clone()
                    .unwrap_or_else(|| PLACEHOLDER_USERNAME.to_string()),
            ),
            display_name,
            profile_picture_url: Some(avatar.unwrap_or_else(|| PLACEHOLDER_AVATAR.to_string())),
            access_token: token.access_token.clone(),
            refresh_token: token.refresh_token.clone(),
            token_expires_at: token.expires_at(None),
        })
    }
}
