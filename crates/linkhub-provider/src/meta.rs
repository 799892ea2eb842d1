//! Meta (Facebook / Instagram) Graph API adapter.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use linkhub_core::config::ProviderCredentials;
use linkhub_core::error::{AppError, ErrorKind};
use linkhub_core::result::AppResult;
use linkhub_entity::{NormalizedProfile, Platform, RawToken};

use crate::adapter::ProviderAdapter;
use crate::http::{Endpoints, present, send_json};

const AUTHORIZE_ENDPOINT: &str = "https://www.facebook.com/v19.0/dialog/oauth";
const TOKEN_ENDPOINT: &str = "https://graph.facebook.com/v19.0/oauth/access_token";
const PROFILE_ENDPOINT: &str = "https://graph.facebook.com/v19.0/me";

const SCOPES: &[&str] = &["email", "public_profile", "pages_show_list", "instagram_basic"];
const PROFILE_FIELDS: &str = "id,name,email,picture";

/// Graph API tokens without `expires_in` are treated as long-lived.
const DEFAULT_TOKEN_LIFETIME_DAYS: i64 = 60;

#[derive(Debug, Deserialize)]
struct MetaTokenResponse {
    access_token: Option<String>,
    expires_in: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct MetaProfile {
    id: Option<String>,
    name: Option<String>,
    email: Option<String>,
    picture: Option<MetaPicture>,
}

#[derive(Debug, Deserialize)]
struct MetaPicture {
    data: Option<MetaPictureData>,
}

#[derive(Debug, Deserialize)]
struct MetaPictureData {
    url: Option<String>,
}

/// Meta adapter. Exchanges codes with a query-string GET.
#[derive(Debug, Clone)]
pub struct MetaAdapter {
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    endpoints: Endpoints,
    http: Client,
}

impl MetaAdapter {
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
impl ProviderAdapter for MetaAdapter {
    fn platform(&self) -> Platform {
        Platform::Meta
    }

    fn scopes(&self) -> &'static [&'static str] {
        SCOPES
    }

    fn authorization_url(&self, state: &str) -> Url {
        let mut url = self.endpoints.authorize.clone();
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("scope", &SCOPES.join(","))
            .append_pair("response_type", "code")
            .append_pair("state", state);
        url
    }

    async fn exchange_code(&self, code: &str) -> AppResult<RawToken> {
        let request = self.http.get(self.endpoints.token.clone()).query(&[
            ("client_id", self.client_id.as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("code", code),
        ]);
        let body: MetaTokenResponse =
            send_json(request, Platform::Meta, ErrorKind::ProviderExchange, "token exchange")
                .await?;

        let access_token = present(body.access_token)
            .ok_or_else(|| AppError::provider_exchange("Meta token response has no access token"))?;

        Ok(RawToken {
            access_token,
            refresh_token: None,
            expires_in: body.expires_in,
            open_id: None,
            obtained_at: Utc::now(),
        })
    }

    async fn fetch_profile(&self, token: &RawToken) -> AppResult<NormalizedProfile> {
        let request = self.http.get(self.endpoints.profile.clone()).query(&[
            ("fields", PROFILE_FIELDS),
            ("access_token", token.access_token.as_str()),
        ]);
        let profile: MetaProfile =
            send_json(request, Platform::Meta, ErrorKind::ProviderProfile, "profile fetch")
                .await?;

        let platform_user_id = present(profile.id)
            .ok_or_else(|| AppError::provider_profile("Meta profile has no user id"))?;
        let name = present(profile.name);
        let picture = profile
            .picture
            .and_then(|p| p.data)
            .and_then(|d| present(d.url));

        Ok(NormalizedProfile {
            platform: Platform::Meta,
            platform_user_id,
            email: present(profile.email),
            display_name: name.clone(),
            username: name,
            profile_picture_url: picture,
            access_token: token.access_token.clone(),
            refresh_token: token.refresh_token.clone(),
            token_expires_at: token
                .expires_at(Some(Duration::days(DEFAULT_TOKEN_LIFETIME_DAYS))),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter() -> MetaAdapter {
        let credentials = ProviderCredentials {
            client_id: "meta client".to_string(),
            client_secret: "shh".to_string(),
            redirect_uri: "http://localhost:8080/oauth/meta/callback".to_string(),
            authorize_url: None,
            token_url: None,
            profile_url: None,
        };
        MetaAdapter::new(&credentials, Client::new()).unwrap()
    }

    #[test]
    fn test_authorization_url_encodes_every_parameter() {
        let url = adapter().authorization_url("a b&c");
        assert!(url.as_str().starts_with(AUTHORIZE_ENDPOINT));

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("client_id".into(), "meta client".into())));
        assert!(pairs.contains(&("state".into(), "a b&c".into())));
        assert!(pairs.contains(&("response_type".into(), "code".into())));
        assert!(pairs.contains(&(
            "scope".into(),
            "email,public_profile,pages_show_list,instagram_basic".into()
        )));
        assert!(!url.as_str().contains("a b&c"));
        assert!(!url.as_str().contains("shh"));
    }
}
