//! The capability set every platform exposes.

use async_trait::async_trait;
use url::Url;

use linkhub_core::result::AppResult;
use linkhub_entity::{NormalizedProfile, Platform, RawToken};

/// One platform's OAuth dialect.
///
/// Adapters hold no per-login state; the only side effects are outbound
/// HTTP calls.
#[async_trait]
pub trait ProviderAdapter: Send + Sync + std::fmt::Debug {
    /// Platform this adapter speaks for.
    fn platform(&self) -> Platform;

    /// Scopes requested in the authorization dialog.
    fn scopes(&self) -> &'static [&'static str];

    /// Authorization dialog URL carrying `state`.
    ///
    /// Includes the client id, redirect URI, `response_type=code` and the
    /// platform's scopes, all URL-encoded.
    fn authorization_url(&self, state: &str) -> Url;

    /// Trade an authorization code for a token.
    ///
    /// Fails with `ProviderExchange` on transport failure, timeout, a
    /// non-success status, or a body without an access token.
    async fn exchange_code(&self, code: &str) -> AppResult<RawToken>;

    /// Fetch the profile behind `token` in the common shape.
    ///
    /// Missing optional fields are tolerated. Fails with `ProviderProfile`
    /// when the platform user id is absent or the call itself fails.
    async fn fetch_profile(&self, token: &RawToken) -> AppResult<NormalizedProfile>;
}
