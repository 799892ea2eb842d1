//! Client for a remote account service that owns social credentials.
//!
//! The service exposes `POST {base}/accounts` with the camelCase
//! [`SocialCredential`] body and answers `201 Created`, `200 OK`, or
//! `409 Conflict`. Anything else is a storage failure.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

use linkhub_core::error::{AppError, ErrorKind};
use linkhub_core::result::AppResult;
use linkhub_entity::SocialCredential;

use crate::store::{CredentialStore, UpsertOutcome};

/// Success envelope returned by the account service.
#[derive(Debug, Deserialize)]
struct Envelope {
    data: SocialCredential,
}

/// [`CredentialStore`] backed by the account service HTTP API.
#[derive(Debug, Clone)]
pub struct AccountServiceClient {
    endpoint: String,
    http: Client,
}

impl AccountServiceClient {
    /// Build a client for the service rooted at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> AppResult<Self> {
        let http = Client::builder().timeout(timeout).build().map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                "Failed to build account service HTTP client",
                e,
            )
        })?;

        Ok(Self {
            endpoint: format!("{}/accounts", base_url.trim_end_matches('/')),
            http,
        })
    }
}

#[async_trait]
impl CredentialStore for AccountServiceClient {
    async fn upsert(&self, credential: &SocialCredential) -> AppResult<UpsertOutcome> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(credential)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Storage, "Account service unreachable", e)
            })?;

        let status = response.status();
        let created = match status {
            StatusCode::CREATED => true,
            StatusCode::OK => false,
            StatusCode::CONFLICT => {
                warn!(
                    platform_user_id = %credential.platform_user_id,
                    "Account service rejected credential with conflict"
                );
                return Err(AppError::conflict(
                    "Account service reported a conflicting credential",
                ));
            }
            _ => {
                let body = response.text().await.unwrap_or_default();
                debug!(status = %status, body = %body, "Account service error body");
                return Err(AppError::storage(format!(
                    "Account service returned HTTP {}",
                    status.as_u16()
                )));
            }
        };

        // An unparseable success body still means the write happened.
        let stored = match response.json::<Envelope>().await {
            Ok(envelope) => envelope.data,
            Err(e) => {
                debug!(error = %e, "Account service success body not understood");
                credential.clone().normalized()
            }
        };

        Ok(if created {
            UpsertOutcome::Created(stored)
        } else {
            UpsertOutcome::Updated(stored)
        })
    }
}
