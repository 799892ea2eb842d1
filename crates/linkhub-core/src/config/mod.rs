//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! layered TOML files and `LINKHUB__`-prefixed environment variables. Each
//! sub-module represents a logical configuration section.

pub mod app;
pub mod auth;
pub mod database;
pub mod logging;
pub mod providers;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, FrontendConfig, ServerConfig};
pub use self::auth::AuthConfig;
pub use self::database::{AccountsBackend, DatabaseConfig, StoreConfig, StoreProvider};
pub use self::logging::LoggingConfig;
pub use self::providers::{ProviderCredentials, ProvidersConfig};

use self::auth::MIN_SECRET_BYTES;
use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Browser redirect targets after a login flow.
    #[serde(default)]
    pub frontend: FrontendConfig,
    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Store selection.
    #[serde(default)]
    pub store: StoreConfig,
    /// Session signing settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// OAuth provider settings.
    #[serde(default)]
    pub providers: ProvidersConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files and the environment.
    ///
    /// Merges `config_path`, an optional `config/{env}` overlay, and
    /// environment variables such as `LINKHUB__AUTH__SIGNING_KEYS__PRIMARY`.
    pub fn load(config_path: &str, env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("LINKHUB")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// Parse configuration from a TOML document only.
    pub fn from_toml_str(toml: &str) -> Result<Self, AppError> {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// Reject configurations the server must not start with.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.auth.signing_keys.is_empty() {
            return Err(AppError::configuration(
                "auth.signing_keys is empty; supply at least one signing secret",
            ));
        }
        if !self.auth.signing_keys.contains_key(&self.auth.active_key_id) {
            return Err(AppError::configuration(format!(
                "auth.active_key_id '{}' has no entry in auth.signing_keys",
                self.auth.active_key_id
            )));
        }
        if let Some((kid, _)) = self
            .auth
            .signing_keys
            .iter()
            .find(|(_, secret)| secret.len() < MIN_SECRET_BYTES)
        {
            return Err(AppError::configuration(format!(
                "signing key '{kid}' is shorter than {MIN_SECRET_BYTES} bytes"
            )));
        }
        if self.auth.session_ttl_hours == 0 {
            return Err(AppError::configuration("auth.session_ttl_hours must be positive"));
        }
        if self.store.accounts == AccountsBackend::Remote
            && self
                .store
                .account_service_url
                .as_deref()
                .is_none_or(str::is_empty)
        {
            return Err(AppError::configuration(
                "store.accounts = \"remote\" requires store.account_service_url",
            ));
        }
        Ok(())
    }
}
