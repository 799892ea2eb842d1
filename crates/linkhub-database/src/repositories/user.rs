//! Internal user repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use linkhub_core::error::{AppError, ErrorKind};
use linkhub_core::result::AppResult;
use linkhub_entity::InternalUser;

use crate::store::UserStore;

/// Unique index enforcing one user per email address.
const EMAIL_CONSTRAINT: &str = "users_email_lower_key";

/// Repository for internal users.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<InternalUser>> {
        sqlx::query_as::<_, InternalUser>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Storage, "Failed to find user by email", e)
            })
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<InternalUser>> {
        sqlx::query_as::<_, InternalUser>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to find user by id", e))
    }

    async fn insert_or_get(&self, user: &InternalUser) -> AppResult<(InternalUser, bool)> {
        let inserted = sqlx::query_as::<_, InternalUser>(
            "INSERT INTO users (id, tenant_id, email, display_name, registered_at) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (id) DO NOTHING \
             RETURNING *",
        )
        .bind(&user.id)
        .bind(user.tenant_id)
        .bind(&user.email)
        .bind(&user.display_name)
        .bind(user.registered_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.constraint() == Some(EMAIL_CONSTRAINT) => {
                AppError::conflict("Email already belongs to another user")
            }
            _ => AppError::with_source(ErrorKind::Storage, "Failed to insert user", e),
        })?;

        if let Some(row) = inserted {
            return Ok((row, true));
        }

        match self.find_by_id(&user.id).await? {
            Some(existing) => Ok((existing, false)),
            None => Err(AppError::storage(format!(
                "User '{}' conflicted on insert but could not be read back",
                user.id
            ))),
        }
    }

    async fn ping(&self) -> AppResult<()> {
        crate::connection::ping(&self.pool).await
    }
}
