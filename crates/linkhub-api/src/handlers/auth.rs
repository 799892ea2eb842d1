//! Session introspection.

use axum::Json;

use linkhub_auth::VerifiedIdentity;

use crate::dto::ApiResponse;
use crate::extractors::AuthUser;

/// GET /api/auth/me
pub async fn me(auth: AuthUser) -> Json<ApiResponse<VerifiedIdentity>> {
    Json(ApiResponse::ok(auth.0))
}
