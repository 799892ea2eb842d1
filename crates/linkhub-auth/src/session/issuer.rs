//! Session token creation.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, Header, encode};
use uuid::Uuid;

use linkhub_core::config::AuthConfig;
use linkhub_core::error::{AppError, ErrorKind};
use linkhub_core::types::TenantId;
use linkhub_entity::InternalUser;

use super::claims::SessionClaims;
use crate::keys::SigningKeys;

/// A signed session credential and the identity it carries.
#[derive(Clone)]
pub struct SessionToken {
    /// Compact JWT.
    pub token: String,
    /// User the token was issued to.
    pub user_id: String,
    /// Tenant of that user.
    pub tenant_id: TenantId,
    /// Issue time.
    pub issued_at: DateTime<Utc>,
    /// Expiry time.
    pub expires_at: DateTime<Utc>,
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionToken")
            .field("user_id", &self.user_id)
            .field("tenant_id", &self.tenant_id)
            .field("issued_at", &self.issued_at)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

/// Signs session tokens for resolved users.
#[derive(Debug, Clone)]
pub struct SessionIssuer {
    keys: Arc<SigningKeys>,
    ttl: Duration,
}

impl SessionIssuer {
    /// Creates an issuer from the shared keyring and auth configuration.
    pub fn new(keys: Arc<SigningKeys>, config: &AuthConfig) -> Self {
        Self {
            keys,
            ttl: Duration::hours(config.session_ttl_hours as i64),
        }
    }

    /// Issue a token for `user`, valid from now for the configured lifetime.
    pub fn issue(&self, user: &InternalUser) -> Result<SessionToken, AppError> {
        self.issue_at(user, Utc::now())
    }

    /// Issue a token for `user` as if the current time were `now`.
    pub fn issue_at(
        &self,
        user: &InternalUser,
        now: DateTime<Utc>,
    ) -> Result<SessionToken, AppError> {
        let expires_at = now + self.ttl;
        let claims = SessionClaims {
            user_id: user.id.clone(),
            tenant_id: user.tenant_id,
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let mut header = Header::new(Algorithm::HS256);
        header.kid = Some(self.keys.active_kid().to_string());

        let token = encode(&header, &claims, self.keys.encoding_key()).map_err(|e| {
            AppError::with_source(ErrorKind::Signing, "Failed to sign session token", e)
        })?;

        Ok(SessionToken {
            token,
            user_id: claims.user_id,
            tenant_id: claims.tenant_id,
            issued_at: now,
            expires_at,
        })
    }
}
