//! Session token verification.
//!
//! This is the contract other services consume: a bearer string in, the
//! `(user_id, tenant_id)` pair out, or an `Authentication` error.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, Validation, decode, decode_header};
use serde::{Deserialize, Serialize};

use linkhub_core::config::AuthConfig;
use linkhub_core::error::AppError;
use linkhub_core::types::TenantId;

use super::claims::SessionClaims;
use crate::keys::SigningKeys;

/// Identity proven by a valid session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedIdentity {
    /// Internal user id.
    pub user_id: String,
    /// Tenant of the user.
    pub tenant_id: TenantId,
}

/// Validates session tokens against the keyring.
#[derive(Debug, Clone)]
pub struct SessionVerifier {
    keys: Arc<SigningKeys>,
    validation: Validation,
    leeway_seconds: i64,
}

impl SessionVerifier {
    /// Creates a verifier from the shared keyring and auth configuration.
    pub fn new(keys: Arc<SigningKeys>, config: &AuthConfig) -> Self {
        // Time claims are checked in verify_at against an explicit instant;
        // the library only enforces signature, algorithm and presence.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "nbf", "iat"]);

        Self {
            keys,
            validation,
            leeway_seconds: config.leeway_seconds as i64,
        }
    }

    /// Verify `token` at the current time.
    pub fn verify(&self, token: &str) -> Result<VerifiedIdentity, AppError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify `token` as if the current time were `at`.
    pub fn verify_at(&self, token: &str, at: DateTime<Utc>) -> Result<VerifiedIdentity, AppError> {
        let claims = self.decode_claims(token)?;
        let now = at.timestamp();

        if now - self.leeway_seconds >= claims.exp {
            return Err(AppError::authentication("Session token has expired"));
        }
        if claims.nbf > now + self.leeway_seconds {
            return Err(AppError::authentication("Session token is not yet valid"));
        }
        if claims.user_id.is_empty() {
            return Err(AppError::authentication("Session token has no subject"));
        }

        Ok(VerifiedIdentity {
            user_id: claims.user_id,
            tenant_id: claims.tenant_id,
        })
    }

    /// Check signature and claim shape, returning the raw claims.
    pub fn decode_claims(&self, token: &str) -> Result<SessionClaims, AppError> {
        let header = decode_header(token)
            .map_err(|_| AppError::authentication("Invalid token format"))?;
        let kid = header
            .kid
            .ok_or_else(|| AppError::authentication("Token has no key id"))?;
        let key = self
            .keys
            .decoding_key(&kid)
            .ok_or_else(|| AppError::authentication("Token signed with an unknown key"))?;

        decode::<SessionClaims>(token, key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    AppError::authentication("Invalid token signature")
                }
                jsonwebtoken::errors::ErrorKind::MissingRequiredClaim(claim) => {
                    AppError::authentication(format!("Token is missing required claim '{claim}'"))
                }
                jsonwebtoken::errors::ErrorKind::InvalidAlgorithm => {
                    AppError::authentication("Token uses an unsupported algorithm")
                }
                _ => AppError::authentication("Token validation failed"),
            })
    }
}
