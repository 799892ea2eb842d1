//! Shared test helpers for integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;
use url::Url;
use wiremock::matchers::{body_partial_json, body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use linkhub_api::{Stores, build_app, build_state};
use linkhub_auth::{SessionIssuer, SigningKeys};
use linkhub_core::config::AppConfig;
use linkhub_core::error::AppError;
use linkhub_core::result::AppResult;
use linkhub_core::types::TenantId;
use linkhub_database::memory::MemoryStore;
use linkhub_database::{CredentialStore, UpsertOutcome};
use linkhub_entity::{InternalUser, SocialCredential};
use linkhub_provider::ProviderRegistry;

pub const FRONTEND: &str = "http://localhost:3000";

/// Test application backed by the memory store and a mock provider server.
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Store shared with the router
    pub store: Arc<MemoryStore>,
    /// Serves every provider's token and profile endpoints
    pub providers: MockServer,
    /// Application config
    pub config: AppConfig,
}

/// Status, redirect target and JSON body of one response.
pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: Value,
}

impl TestResponse {
    /// Query parameter `key` of the redirect target.
    pub fn redirect_param(&self, key: &str) -> Option<String> {
        let location = Url::parse(self.location.as_deref()?).ok()?;
        location
            .query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    /// Redirect target without its query string.
    pub fn redirect_base(&self) -> Option<String> {
        let mut location = Url::parse(self.location.as_deref()?).ok()?;
        location.set_query(None);
        Some(location.to_string())
    }
}

/// Credential store whose writes fail as if the database dropped out.
pub struct BrokenCredentials;

#[async_trait]
impl CredentialStore for BrokenCredentials {
    async fn upsert(&self, _credential: &SocialCredential) -> AppResult<UpsertOutcome> {
        Err(AppError::storage("connection reset by peer"))
    }
}

impl TestApp {
    /// App with all three platforms enabled.
    pub async fn new() -> Self {
        Self::with_platforms(&["meta", "tiktok", "snapchat"]).await
    }

    /// App with only the named platforms enabled.
    pub async fn with_platforms(platforms: &[&str]) -> Self {
        Self::assemble(platforms, None).await
    }

    /// App whose credential writes go to `credentials` instead of the memory store.
    pub async fn with_credentials(credentials: Arc<dyn CredentialStore>) -> Self {
        Self::assemble(&["meta", "tiktok", "snapchat"], Some(credentials)).await
    }

    async fn assemble(
        platforms: &[&str],
        credentials: Option<Arc<dyn CredentialStore>>,
    ) -> Self {
        let providers = MockServer::start().await;
        let config = AppConfig::from_toml_str(&config_toml(&providers.uri(), platforms))
            .expect("test config parses");
        config.validate().expect("test config is valid");

        let store = Arc::new(MemoryStore::new());
        let stores = match credentials {
            Some(credentials) => Stores::new(store.clone(), credentials, Some(store.clone())),
            None => Stores::memory(store.clone()),
        };
        let registry =
            ProviderRegistry::from_config(&config.providers).expect("provider registry builds");
        let state = build_state(config.clone(), &stores, registry).expect("state builds");
        let router = build_app(state, &config.server.cors);

        Self {
            router,
            store,
            providers,
            config,
        }
    }

    /// Session token for an arbitrary identity, signed with the app's keys.
    pub fn session_for(&self, user_id: &str, tenant_id: TenantId) -> String {
        let keys = Arc::new(SigningKeys::from_config(&self.config.auth).expect("keys"));
        SessionIssuer::new(keys, &self.config.auth)
            .issue(&InternalUser {
                id: user_id.to_string(),
                tenant_id,
                email: format!("{user_id}@test.local"),
                display_name: None,
                registered_at: chrono::Utc::now(),
            })
            .expect("issue session")
            .token
    }

    /// Start a login and return the `state` the provider would echo back.
    pub async fn begin_login(&self, platform: &str) -> String {
        let response = self
            .request("GET", &format!("/oauth/{platform}/login"), None, None)
            .await;
        assert_eq!(response.status, StatusCode::FOUND, "login did not redirect");
        response
            .redirect_param("state")
            .expect("authorize URL carries state")
    }

    /// Complete a callback with a fresh state and the given code.
    pub async fn callback(&self, platform: &str, code: &str) -> TestResponse {
        let state = self.begin_login(platform).await;
        self.callback_with_state(platform, code, &state).await
    }

    pub async fn callback_with_state(
        &self,
        platform: &str,
        code: &str,
        state: &str,
    ) -> TestResponse {
        let mut uri = Url::parse("http://linkhub.test").expect("static url");
        uri.set_path(&format!("/oauth/{platform}/callback"));
        uri.query_pairs_mut()
            .append_pair("code", code)
            .append_pair("state", state);
        let path_and_query = format!("{}?{}", uri.path(), uri.query().unwrap_or_default());
        self.request("GET", &path_and_query, None, None).await
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");
        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            location,
            body,
        }
    }

    // ── Provider mocks ──

    /// Meta accepts `code` and returns a profile for `id`.
    pub async fn mock_meta_user(&self, code: &str, id: &str, email: Option<&str>) {
        let access = format!("meta-access-{id}");
        Mock::given(method("GET"))
            .and(path("/meta/token"))
            .and(query_param("code", code))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": access,
                "token_type": "bearer",
                "expires_in": 5183944
            })))
            .mount(&self.providers)
            .await;

        let mut profile = json!({
            "id": id,
            "name": format!("Meta {id}"),
            "picture": { "data": { "url": format!("https://cdn.test/{id}.png") } }
        });
        if let Some(email) = email {
            profile["email"] = json!(email);
        }
        Mock::given(method("GET"))
            .and(path("/meta/me"))
            .and(query_param("access_token", access.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(profile))
            .mount(&self.providers)
            .await;
    }

    /// TikTok accepts `code` and returns a profile for `open_id`.
    pub async fn mock_tiktok_user(&self, code: &str, open_id: &str) {
        let access = format!("tt-access-{open_id}");
        Mock::given(method("POST"))
            .and(path("/tiktok/token"))
            .and(body_partial_json(json!({ "code": code })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "access_token": access,
                    "refresh_token": "tt-refresh",
                    "expires_in": 86400,
                    "open_id": open_id
                }
            })))
            .mount(&self.providers)
            .await;

        Mock::given(method("GET"))
            .and(path("/tiktok/me"))
            .and(wiremock::matchers::header(
                "authorization",
                format!("Bearer {access}").as_str(),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "user": { "open_id": open_id, "display_name": "tt user" } }
            })))
            .mount(&self.providers)
            .await;
    }

    /// Snapchat accepts `code` and returns a profile for `id`.
    pub async fn mock_snapchat_user(&self, code: &str, id: &str) {
        let access = format!("snap-access-{id}");
        Mock::given(method("POST"))
            .and(path("/snapchat/token"))
            .and(body_string_contains(format!("code={code}").as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": access,
                "expires_in": 1800
            })))
            .mount(&self.providers)
            .await;

        Mock::given(method("GET"))
            .and(path("/snapchat/me"))
            .and(wiremock::matchers::header(
                "authorization",
                format!("Bearer {access}").as_str(),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "me": { "id": id, "display_name": "snap user" }
            })))
            .mount(&self.providers)
            .await;
    }

    /// `platform`'s token endpoint answers with `status`.
    pub async fn mock_token_status(&self, platform: &str, http_method: &str, status: u16) {
        Mock::given(method(http_method))
            .and(path(format!("/{platform}/token")))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "error": "invalid_grant"
            })))
            .mount(&self.providers)
            .await;
    }
}

fn config_toml(provider_base: &str, platforms: &[&str]) -> String {
    let mut toml = format!(
        r#"
        [frontend]
        base_url = "{FRONTEND}"

        [store]
        provider = "memory"

        [auth]
        active_key_id = "it"

        [auth.signing_keys]
        it = "integration-secret-integration-secret"

        [providers]
        timeout_seconds = 2
        "#
    );
    for platform in platforms {
        toml.push_str(&format!(
            r#"
        [providers.{platform}]
        client_id = "{platform}-client"
        client_secret = "{platform}-secret"
        redirect_uri = "http://localhost:8080/oauth/{platform}/callback"
        authorize_url = "{provider_base}/{platform}/authorize"
        token_url = "{provider_base}/{platform}/token"
        profile_url = "{provider_base}/{platform}/me"
        "#
        ));
    }
    toml
}
