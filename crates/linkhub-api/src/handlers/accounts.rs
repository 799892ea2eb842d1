//! Account service handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::Utc;
use validator::Validate;

use linkhub_core::error::AppError;
use linkhub_entity::SocialCredential;

use crate::dto::{ApiResponse, LinkedAccountResponse, UpsertAccountRequest};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /accounts
///
/// `201 Created` for a new row, `200 OK` when an existing row was updated.
///
/// Unauthenticated: the caller names any `userId` and `tenantId`. Expose this
/// route only to trusted internal callers, never to the public internet.
pub async fn upsert_account(
    State(state): State<AppState>,
    Json(req): Json<UpsertAccountRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SocialCredential>>), ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(format!("Invalid account: {e}")))?;

    let outcome = state.accounts.upsert(req.into_credential(Utc::now())).await?;
    let status = if outcome.is_created() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(ApiResponse::ok(outcome.into_credential()))))
}

/// GET /api/accounts
pub async fn list_accounts(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<LinkedAccountResponse>>>, ApiError> {
    let accounts = state.accounts.list_for(auth.identity()).await?;
    Ok(Json(ApiResponse::ok(
        accounts.into_iter().map(LinkedAccountResponse::from).collect(),
    )))
}
