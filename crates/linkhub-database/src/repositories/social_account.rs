//! Social account repository implementation.

use async_trait::async_trait;
use sqlx::{FromRow, PgPool, Row};

use linkhub_core::error::{AppError, ErrorKind};
use linkhub_core::result::AppResult;
use linkhub_core::types::TenantId;
use linkhub_entity::SocialCredential;

use crate::store::{CredentialQuery, CredentialStore, UpsertOutcome};

/// Single-statement upsert. Optional columns keep their stored value when
/// the incoming one is NULL or empty; `linked_at` and `platform` are only
/// written on insert.
const UPSERT_SQL: &str = "\
INSERT INTO social_accounts \
    (platform_user_id, platform, user_id, tenant_id, access_token, refresh_token, \
     expires_at, username, profile_pic, linked_at, updated_at) \
VALUES ($1, $2, $3, $4, $5, NULLIF($6, ''), $7, NULLIF($8, ''), NULLIF($9, ''), $10, $11) \
ON CONFLICT (platform_user_id) DO UPDATE SET \
    user_id = EXCLUDED.user_id, \
    tenant_id = EXCLUDED.tenant_id, \
    access_token = EXCLUDED.access_token, \
    refresh_token = COALESCE(EXCLUDED.refresh_token, social_accounts.refresh_token), \
    expires_at = COALESCE(EXCLUDED.expires_at, social_accounts.expires_at), \
    username = COALESCE(EXCLUDED.username, social_accounts.username), \
    profile_pic = COALESCE(EXCLUDED.profile_pic, social_accounts.profile_pic), \
    updated_at = EXCLUDED.updated_at \
RETURNING *, (xmax = 0) AS inserted";

/// Repository for linked social accounts.
#[derive(Debug, Clone)]
pub struct SocialAccountRepository {
    pool: PgPool,
}

impl SocialAccountRepository {
    /// Create a new social account repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for SocialAccountRepository {
    async fn upsert(&self, credential: &SocialCredential) -> AppResult<UpsertOutcome> {
        let row = sqlx::query(UPSERT_SQL)
            .bind(&credential.platform_user_id)
            .bind(credential.platform)
            .bind(&credential.user_id)
            .bind(credential.tenant_id)
            .bind(&credential.access_token)
            .bind(&credential.refresh_token)
            .bind(credential.expires_at)
            .bind(&credential.username)
            .bind(&credential.profile_picture_url)
            .bind(credential.linked_at)
            .bind(credential.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Storage, "Failed to upsert social account", e)
            })?;

        let stored = SocialCredential::from_row(&row).map_err(|e| {
            AppError::with_source(ErrorKind::Storage, "Failed to decode social account", e)
        })?;
        let inserted: bool = row.try_get("inserted").map_err(|e| {
            AppError::with_source(ErrorKind::Storage, "Failed to decode upsert outcome", e)
        })?;

        Ok(if inserted {
            UpsertOutcome::Created(stored)
        } else {
            UpsertOutcome::Updated(stored)
        })
    }
}

#[async_trait]
impl CredentialQuery for SocialAccountRepository {
    async fn find(&self, platform_user_id: &str) -> AppResult<Option<SocialCredential>> {
        sqlx::query_as::<_, SocialCredential>(
            "SELECT * FROM social_accounts WHERE platform_user_id = $1",
        )
        .bind(platform_user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to find social account", e))
    }

    async fn list_for_owner(
        &self,
        user_id: &str,
        tenant_id: TenantId,
    ) -> AppResult<Vec<SocialCredential>> {
        sqlx::query_as::<_, SocialCredential>(
            "SELECT * FROM social_accounts \
             WHERE user_id = $1 AND tenant_id = $2 \
             ORDER BY linked_at",
        )
        .bind(user_id)
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Storage, "Failed to list social accounts", e)
        })
    }
}
