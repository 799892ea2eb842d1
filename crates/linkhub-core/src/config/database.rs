//! Store selection and PostgreSQL pool configuration.

use serde::{Deserialize, Serialize};

/// Database connection pool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL.
    #[serde(default = "default_url")]
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Connection acquire timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
    /// Idle connection timeout in seconds.
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u64,
    /// Apply pending migrations when the server starts.
    #[serde(default = "default_true")]
    pub run_migrations: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_seconds: default_connect_timeout(),
            idle_timeout_seconds: default_idle_timeout(),
            run_migrations: default_true(),
        }
    }
}

/// Backing store for users and, when local, social credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreProvider {
    /// PostgreSQL via sqlx.
    #[default]
    Postgres,
    /// Process-local maps. Suitable for development and tests only.
    Memory,
}

/// Where social credentials are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccountsBackend {
    /// Same store as users.
    #[default]
    Local,
    /// A remote account service reached over HTTP.
    Remote,
}

/// Store selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Identity store provider.
    #[serde(default)]
    pub provider: StoreProvider,
    /// Credential persistence backend.
    #[serde(default)]
    pub accounts: AccountsBackend,
    /// Base URL of the remote account service (required when `accounts = "remote"`).
    #[serde(default)]
    pub account_service_url: Option<String>,
    /// Timeout for calls to the remote account service, in seconds.
    #[serde(default = "default_account_service_timeout")]
    pub account_service_timeout_seconds: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            provider: StoreProvider::default(),
            accounts: AccountsBackend::default(),
            account_service_url: None,
            account_service_timeout_seconds: default_account_service_timeout(),
        }
    }
}

fn default_url() -> String {
    "postgres://localhost:5432/linkhub".to_string()
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    2
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_idle_timeout() -> u64 {
    300
}

fn default_true() -> bool {
    true
}

fn default_account_service_timeout() -> u64 {
    5
}
