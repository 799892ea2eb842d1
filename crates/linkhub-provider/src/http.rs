//! Outbound request plumbing shared by the adapters.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use linkhub_core::config::ProviderCredentials;
use linkhub_core::error::{AppError, ErrorKind};
use linkhub_core::result::AppResult;
use linkhub_entity::Platform;

/// Build the HTTP client shared by every adapter.
pub fn build_client(timeout: Duration) -> AppResult<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("linkhub/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                "Failed to build provider HTTP client",
                e,
            )
        })
}

/// Resolved endpoint set for one platform.
#[derive(Debug, Clone)]
pub(crate) struct Endpoints {
    pub authorize: Url,
    pub token: Url,
    pub profile: Url,
}

impl Endpoints {
    /// Use the configured overrides where present, else the platform defaults.
    pub(crate) fn resolve(
        credentials: &ProviderCredentials,
        authorize: &str,
        token: &str,
        profile: &str,
    ) -> AppResult<Self> {
        Ok(Self {
            authorize: parse(credentials.authorize_url.as_deref().unwrap_or(authorize))?,
            token: parse(credentials.token_url.as_deref().unwrap_or(token))?,
            profile: parse(credentials.profile_url.as_deref().unwrap_or(profile))?,
        })
    }
}

fn parse(raw: &str) -> AppResult<Url> {
    Url::parse(raw).map_err(|e| {
        AppError::with_source(
            ErrorKind::Configuration,
            format!("Invalid provider endpoint '{raw}'"),
            e,
        )
    })
}

/// Send `request` and decode a JSON success body.
///
/// Every failure carries `kind`. Response bodies of failed calls are logged
/// at debug level only; they never reach the error message.
pub(crate) async fn send_json<T: DeserializeOwned>(
    request: RequestBuilder,
    platform: Platform,
    kind: ErrorKind,
    step: &str,
) -> AppResult<T> {
    let response = request.send().await.map_err(|e| {
        let message = if e.is_timeout() {
            format!("{} {step} timed out", platform.display_name())
        } else {
            format!("{} {step} request failed", platform.display_name())
        };
        AppError::with_source(kind, message, e)
    })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        debug!(platform = %platform, step, status = %status, body = %body, "Provider error body");
        return Err(AppError::new(
            kind,
            format!(
                "{} {step} returned HTTP {}",
                platform.display_name(),
                status.as_u16()
            ),
        ));
    }

    response.json::<T>().await.map_err(|e| {
        AppError::with_source(
            kind,
            format!("{} {step} returned a malformed body", platform.display_name()),
            e,
        )
    })
}

/// Trimmed value, `None` when blank.
pub(crate) fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
