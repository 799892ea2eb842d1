//! `AuthUser` extractor: verifies the bearer session token.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;

use linkhub_auth::VerifiedIdentity;
use linkhub_core::error::AppError;

use crate::error::ApiError;
use crate::state::AppState;

/// Identity proven by the request's `Authorization: Bearer` header.
#[derive(Debug, Clone)]
pub struct AuthUser(pub VerifiedIdentity);

impl AuthUser {
    /// Returns the inner identity.
    pub fn identity(&self) -> &VerifiedIdentity {
        &self.0
    }
}

impl std::ops::Deref for AuthUser {
    type Target = VerifiedIdentity;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError::authentication("Missing or malformed bearer token"))?;

        let identity = state.verifier.verify(bearer.token())?;
        Ok(AuthUser(identity))
    }
}
