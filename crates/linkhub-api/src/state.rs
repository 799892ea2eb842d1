//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use linkhub_auth::SessionVerifier;
use linkhub_core::config::AppConfig;
use linkhub_database::UserStore;
use linkhub_service::{AccountService, LinkingOrchestrator};

/// Dependencies handed to every handler via `State<AppState>`.
///
/// All fields are `Arc`-wrapped so cloning per request is cheap.
#[derive(Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Auth ─────────────────────────────────────────────────
    /// Session token verifier used by the `AuthUser` extractor
    pub verifier: Arc<SessionVerifier>,

    // ── Services ─────────────────────────────────────────────
    /// OAuth callback flow
    pub orchestrator: Arc<LinkingOrchestrator>,
    /// Account create-or-update and listing
    pub accounts: Arc<AccountService>,

    // ── Infrastructure ───────────────────────────────────────
    /// User store, pinged by the health check
    pub users: Arc<dyn UserStore>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("orchestrator", &self.orchestrator)
            .field("accounts", &self.accounts)
            .finish_non_exhaustive()
    }
}
