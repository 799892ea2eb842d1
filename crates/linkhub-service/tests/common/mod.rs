//! Shared fixtures for service tests: a scripted provider and a wired flow.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use url::Url;

use linkhub_auth::{SessionIssuer, SessionVerifier, SigningKeys, StateSigner};
use linkhub_core::config::AuthConfig;
use linkhub_core::error::AppError;
use linkhub_core::result::AppResult;
use linkhub_database::memory::MemoryStore;
use linkhub_database::{CredentialStore, UpsertOutcome, UserStore};
use linkhub_entity::{InternalUser, NormalizedProfile, Platform, RawToken, SocialCredential};
use linkhub_provider::{ProviderAdapter, ProviderRegistry};
use linkhub_service::{AccountLinker, IdentityResolver, LinkingOrchestrator};

/// Adapter returning canned results and counting calls.
#[derive(Debug)]
pub struct ScriptedAdapter {
    pub platform: Platform,
    pub exchange: Result<RawToken, AppError>,
    pub profile: Result<NormalizedProfile, AppError>,
    pub exchanges: AtomicUsize,
    pub profile_fetches: AtomicUsize,
}

impl ScriptedAdapter {
    pub fn succeeding(platform: Platform, id: &str, email: Option<&str>) -> Self {
        Self {
            platform,
            exchange: Ok(raw_token("access-1")),
            profile: Ok(profile(platform, id, email)),
            exchanges: AtomicUsize::new(0),
            profile_fetches: AtomicUsize::new(0),
        }
    }

    pub fn failing_exchange(platform: Platform, error: AppError) -> Self {
        Self {
            exchange: Err(error),
            ..Self::succeeding(platform, "unused", None)
        }
    }

    pub fn failing_profile(platform: Platform, error: AppError) -> Self {
        Self {
            profile: Err(error),
            ..Self::succeeding(platform, "unused", None)
        }
    }
}

#[async_trait]
impl ProviderAdapter for ScriptedAdapter {
    fn platform(&self) -> Platform {
        self.platform
    }

    fn scopes(&self) -> &'static [&'static str] {
        &["basic"]
    }

    fn authorization_url(&self, state: &str) -> Url {
        let mut url = Url::parse("https://provider.test/authorize").expect("static url");
        url.query_pairs_mut().append_pair("state", state);
        url
    }

    async fn exchange_code(&self, _code: &str) -> AppResult<RawToken> {
        self.exchanges.fetch_add(1, Ordering::SeqCst);
        self.exchange.clone()
    }

    async fn fetch_profile(&self, _token: &RawToken) -> AppResult<NormalizedProfile> {
        self.profile_fetches.fetch_add(1, Ordering::SeqCst);
        self.profile.clone()
    }
}

/// User store whose every call fails with `Storage`.
#[derive(Debug, Default)]
pub struct UnreachableUsers;

#[async_trait]
impl UserStore for UnreachableUsers {
    async fn find_by_email(&self, _email: &str) -> AppResult<Option<InternalUser>> {
        Err(AppError::storage("connection refused"))
    }

    async fn find_by_id(&self, _id: &str) -> AppResult<Option<InternalUser>> {
        Err(AppError::storage("connection refused"))
    }

    async fn insert_or_get(&self, _user: &InternalUser) -> AppResult<(InternalUser, bool)> {
        Err(AppError::storage("connection refused"))
    }

    async fn ping(&self) -> AppResult<()> {
        Err(AppError::storage("connection refused"))
    }
}

/// Credential store rejecting every write with a fixed error.
#[derive(Debug)]
pub struct RejectingCredentials {
    pub error: AppError,
    pub attempts: AtomicUsize,
}

impl RejectingCredentials {
    pub fn new(error: AppError) -> Self {
        Self {
            error,
            attempts: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl CredentialStore for RejectingCredentials {
    async fn upsert(&self, _credential: &SocialCredential) -> AppResult<UpsertOutcome> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(self.error.clone())
    }
}

pub fn raw_token(access: &str) -> RawToken {
    RawToken {
        access_token: access.to_string(),
        refresh_token: Some("refresh-1".to_string()),
        expires_in: Some(3600),
        open_id: None,
        obtained_at: Utc::now(),
    }
}

pub fn profile(platform: Platform, id: &str, email: Option<&str>) -> NormalizedProfile {
    NormalizedProfile {
        platform,
        platform_user_id: id.to_string(),
        email: email.map(str::to_string),
        display_name: Some("Ann".to_string()),
        username: Some("ann".to_string()),
        profile_picture_url: None,
        access_token: "access-1".to_string(),
        refresh_token: Some("refresh-1".to_string()),
        token_expires_at: None,
    }
}

pub fn auth_config() -> AuthConfig {
    let mut signing_keys = BTreeMap::new();
    signing_keys.insert(
        "test".to_string(),
        "test-secret-test-secret-test-secret".to_string(),
    );
    AuthConfig {
        active_key_id: "test".to_string(),
        signing_keys,
        ..AuthConfig::default()
    }
}

/// A flow wired to the memory store and the given adapters.
pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub orchestrator: LinkingOrchestrator,
    pub verifier: SessionVerifier,
    pub state: Arc<StateSigner>,
}

impl Harness {
    pub fn new(adapters: Vec<Arc<dyn ProviderAdapter>>) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::with_stores(adapters, store.clone(), store.clone(), store)
    }

    /// Like [`Harness::new`], with the resolver and linker on custom stores.
    /// `store` stays available for inspection.
    pub fn with_stores(
        adapters: Vec<Arc<dyn ProviderAdapter>>,
        store: Arc<MemoryStore>,
        users: Arc<dyn UserStore>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        let config = auth_config();
        let keys = Arc::new(SigningKeys::from_config(&config).expect("keys"));
        let state = Arc::new(StateSigner::new(Arc::clone(&keys), &config));
        let sessions = Arc::new(SessionIssuer::new(Arc::clone(&keys), &config));
        let verifier = SessionVerifier::new(keys, &config);

        let mut registry = ProviderRegistry::new();
        for adapter in adapters {
            registry.register(adapter);
        }

        let orchestrator = LinkingOrchestrator::new(
            Arc::new(registry),
            Arc::clone(&state),
            IdentityResolver::new(users),
            AccountLinker::new(credentials),
            sessions,
        );

        Self {
            store,
            orchestrator,
            verifier,
            state,
        }
    }

    /// A fresh, valid state for `platform`.
    pub fn state_for(&self, platform: Platform) -> String {
        self.state.create(platform).expect("state")
    }
}
