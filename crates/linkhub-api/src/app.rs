//! Application builder: wires stores, services and router into an Axum app.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use linkhub_auth::{SessionIssuer, SessionVerifier, SigningKeys, StateSigner};
use linkhub_core::config::{AccountsBackend, AppConfig, CorsConfig, StoreProvider};
use linkhub_core::result::AppResult;
use linkhub_database::memory::MemoryStore;
use linkhub_database::remote::AccountServiceClient;
use linkhub_database::repositories::{SocialAccountRepository, UserRepository};
use linkhub_database::{CredentialQuery, CredentialStore, DatabasePool, UserStore, migration};
use linkhub_provider::ProviderRegistry;
use linkhub_service::{AccountLinker, AccountService, IdentityResolver, LinkingOrchestrator};

use crate::middleware::cors::build_cors_layer;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState, cors_config: &CorsConfig) -> Router {
    build_router(state)
        .layer(CompressionLayer::new())
        .layer(build_cors_layer(cors_config))
        .layer(TraceLayer::new_for_http())
}

/// The stores selected by `[store]`.
#[derive(Clone)]
pub struct Stores {
    /// Internal users.
    pub users: Arc<dyn UserStore>,
    /// Credential writes.
    pub credentials: Arc<dyn CredentialStore>,
    /// Credential reads; absent when credentials live in a remote service.
    pub query: Option<Arc<dyn CredentialQuery>>,
    pool: Option<DatabasePool>,
}

impl std::fmt::Debug for Stores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stores")
            .field("queryable", &self.query.is_some())
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}

impl Stores {
    /// Stores assembled from separate backends, with no pool to close.
    pub fn new(
        users: Arc<dyn UserStore>,
        credentials: Arc<dyn CredentialStore>,
        query: Option<Arc<dyn CredentialQuery>>,
    ) -> Self {
        Self {
            users,
            credentials,
            query,
            pool: None,
        }
    }

    /// Users and credentials in one process-local store.
    pub fn memory(store: Arc<MemoryStore>) -> Self {
        Self::new(store.clone(), store.clone(), Some(store))
    }

    /// Open the stores named by configuration, running migrations when asked.
    pub async fn connect(config: &AppConfig) -> AppResult<Self> {
        let mut stores = match config.store.provider {
            StoreProvider::Memory => {
                info!("Using in-memory store");
                Self::memory(Arc::new(MemoryStore::new()))
            }
            StoreProvider::Postgres => {
                let pool = DatabasePool::connect(&config.database).await?;
                if config.database.run_migrations {
                    migration::run_migrations(pool.pool()).await?;
                }
                let accounts = Arc::new(SocialAccountRepository::new(pool.pool().clone()));
                Self {
                    users: Arc::new(UserRepository::new(pool.pool().clone())),
                    credentials: accounts.clone(),
                    query: Some(accounts),
                    pool: Some(pool),
                }
            }
        };

        if config.store.accounts == AccountsBackend::Remote {
            let base_url = config.store.account_service_url.as_deref().unwrap_or_default();
            info!(url = %base_url, "Credentials are written to the remote account service");
            stores.credentials = Arc::new(AccountServiceClient::new(
                base_url,
                Duration::from_secs(config.store.account_service_timeout_seconds),
            )?);
            stores.query = None;
        }

        Ok(stores)
    }

    /// Close the database pool, if any.
    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}

/// Build the shared state from configuration, stores and provider adapters.
pub fn build_state(
    config: AppConfig,
    stores: &Stores,
    providers: ProviderRegistry,
) -> AppResult<AppState> {
    let keys = Arc::new(SigningKeys::from_config(&config.auth)?);
    let state_signer = Arc::new(StateSigner::new(keys.clone(), &config.auth));
    let issuer = Arc::new(SessionIssuer::new(keys.clone(), &config.auth));
    let verifier = Arc::new(SessionVerifier::new(keys, &config.auth));

    let orchestrator = LinkingOrchestrator::new(
        Arc::new(providers),
        state_signer,
        IdentityResolver::new(stores.users.clone()),
        AccountLinker::new(stores.credentials.clone()),
        issuer,
    );
    let accounts = AccountService::new(stores.credentials.clone(), stores.query.clone());

    Ok(AppState {
        config: Arc::new(config),
        verifier,
        orchestrator: Arc::new(orchestrator),
        accounts: Arc::new(accounts),
        users: stores.users.clone(),
    })
}
