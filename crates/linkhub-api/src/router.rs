//! Route definitions for the LinkHub HTTP API.
//!
//! OAuth redirects and the account service endpoint live at the root.
//! Session-authenticated and operational endpoints are mounted under `/api`.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the Axum router with all routes and per-request logging.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(account_routes())
        .merge(health_routes());

    Router::new()
        .nest("/api", api_routes)
        .merge(oauth_routes())
        .merge(account_service_routes())
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Provider login redirect and callback.
fn oauth_routes() -> Router<AppState> {
    Router::new()
        .route("/oauth/{platform}/login", get(handlers::oauth::login))
        .route("/oauth/{platform}/callback", get(handlers::oauth::callback))
}

/// Credential create-or-update, in the account service wire format.
///
/// Carries no authentication; deploy behind a network boundary that admits
/// only internal services.
fn account_service_routes() -> Router<AppState> {
    Router::new().route("/accounts", post(handlers::accounts::upsert_account))
}

/// Session introspection
fn auth_routes() -> Router<AppState> {
    Router::new().route("/auth/me", get(handlers::auth::me))
}

/// Linked accounts of the session owner
fn account_routes() -> Router<AppState> {
    Router::new().route("/accounts", get(handlers::accounts::list_accounts))
}

/// Health check
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
