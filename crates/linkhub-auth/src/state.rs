//! Signed OAuth `state` parameter.
//!
//! The state is a short-lived JWT naming the platform the login started on.
//! Each nonce is accepted once per process; the replay cache lives in memory
//! and is not shared between instances.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, Header, Validation, decode, decode_header, encode};
use moka::future::Cache;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use linkhub_core::config::AuthConfig;
use linkhub_core::error::{AppError, ErrorKind};
use linkhub_entity::Platform;

use crate::keys::SigningKeys;

const MAX_PENDING_STATES: u64 = 100_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StateClaims {
    nonce: String,
    platform: String,
    iat: i64,
    exp: i64,
}

/// Creates and consumes OAuth `state` values.
#[derive(Debug, Clone)]
pub struct StateSigner {
    keys: Arc<SigningKeys>,
    ttl: Duration,
    validation: Validation,
    consumed: Cache<String, ()>,
}

impl StateSigner {
    /// Creates a signer sharing the session keyring.
    pub fn new(keys: Arc<SigningKeys>, config: &AuthConfig) -> Self {
        let ttl = Duration::minutes(config.state_ttl_minutes as i64);

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = config.leeway_seconds;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "iat"]);

        // Nonces only need remembering until their state would expire anyway.
        let remember = StdDuration::from_secs(
            config.state_ttl_minutes * 60 + config.leeway_seconds + 60,
        );
        let consumed = Cache::builder()
            .max_capacity(MAX_PENDING_STATES)
            .time_to_live(remember)
            .build();

        Self {
            keys,
            ttl,
            validation,
            consumed,
        }
    }

    /// Create a state value for a login starting now on `platform`.
    pub fn create(&self, platform: Platform) -> Result<String, AppError> {
        self.create_at(platform, Utc::now())
    }

    /// Create a state value as if the current time were `now`.
    pub fn create_at(&self, platform: Platform, now: DateTime<Utc>) -> Result<String, AppError> {
        let claims = StateClaims {
            nonce: Uuid::new_v4().simple().to_string(),
            platform: platform.as_str().to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        let mut header = Header::new(Algorithm::HS256);
        header.kid = Some(self.keys.active_kid().to_string());

        encode(&header, &claims, self.keys.encoding_key()).map_err(|e| {
            AppError::with_source(ErrorKind::Signing, "Failed to sign OAuth state", e)
        })
    }

    /// Validate `state` for a callback on `platform` and mark it used.
    ///
    /// Every failure is a `Validation` error: the browser has to restart the
    /// login to get a fresh state.
    pub async fn consume(&self, state: &str, platform: Platform) -> Result<(), AppError> {
        let claims = self.decode_claims(state)?;

        if claims.platform != platform.as_str() {
            debug!(
                expected = platform.as_str(),
                actual = %claims.platform,
                "OAuth state issued for another platform"
            );
            return Err(AppError::validation("OAuth state does not match this platform"));
        }

        let entry = self.consumed.entry(claims.nonce).or_insert(()).await;
        if !entry.is_fresh() {
            return Err(AppError::validation("OAuth state has already been used"));
        }
        Ok(())
    }

    fn decode_claims(&self, state: &str) -> Result<StateClaims, AppError> {
        if state.is_empty() {
            return Err(AppError::validation("Missing OAuth state"));
        }

        let key = decode_header(state)
            .ok()
            .and_then(|header| header.kid)
            .and_then(|kid| self.keys.decoding_key(&kid))
            .ok_or_else(|| AppError::validation("Invalid OAuth state"))?;

        decode::<StateClaims>(state, key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::validation("OAuth state has expired")
                }
                _ => AppError::validation("Invalid OAuth state"),
            })
    }
}
