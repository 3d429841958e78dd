//! User account repository.

use crate::domain::{Role, User};
use crate::error::{ApiResult, AppError};
use sqlx::PgPool;
use uuid::Uuid;

/// Conflict message shared by the defensive email check and the unique
/// constraint on `users.email`.
pub const EMAIL_TAKEN: &str = "Email already in use";

/// Fields a user may change on their own profile. `None` leaves the column
/// untouched.
#[derive(Debug, Default, Clone)]
pub struct ProfilePatch {
    /// New display name.
    pub name: Option<String>,
    /// New email address.
    pub email: Option<String>,
    /// New interest list.
    pub interests: Option<Vec<String>>,
    /// New avatar URL.
    pub avatar_url: Option<String>,
}

/// PostgreSQL-backed user repository.
#[derive(Clone)]
pub struct UserStore {
    pool: PgPool,
}

impl UserStore {
    /// Create a repository on the shared pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new account.
    ///
    /// # Errors
    ///
    /// Maps a duplicate email to the shared conflict message.
    pub async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> ApiResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, name, email, password_hash, role)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::db_or_conflict(e, EMAIL_TAKEN))
    }

    /// Look up by primary key.
    ///
    /// # Errors
    ///
    /// Database failures only; a missing row is `Ok(None)`.
    pub async fn find_by_id(&self, id: Uuid) -> ApiResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::db)
    }

    /// Look up by email, for login.
    ///
    /// # Errors
    ///
    /// Database failures only.
    pub async fn find_by_email(&self, email: &str) -> ApiResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::db)
    }

    /// Look up by active refresh token, for the exchange flow.
    ///
    /// # Errors
    ///
    /// Database failures only.
    pub async fn find_by_refresh_token(&self, refresh_token: &str) -> ApiResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE refresh_token = $1")
            .bind(refresh_token)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::db)
    }

    /// Store (or clear) the single active refresh token.
    ///
    /// # Errors
    ///
    /// Database failures only.
    pub async fn set_refresh_token(&self, id: Uuid, refresh_token: Option<&str>) -> ApiResult<()> {
        sqlx::query("UPDATE users SET refresh_token = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(refresh_token)
            .execute(&self.pool)
            .await
            .map_err(AppError::db)?;
        Ok(())
    }

    /// Whether another account already uses this email.
    ///
    /// # Errors
    ///
    /// Database failures only.
    pub async fn email_taken_by_other(&self, email: &str, user_id: Uuid) -> ApiResult<bool> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 AND id <> $2)",
        )
        .bind(email)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::db)?;
        Ok(taken)
    }

    /// Apply a profile patch; untouched fields keep their values.
    ///
    /// # Errors
    ///
    /// Maps a duplicate email to the shared conflict message.
    pub async fn update_profile(&self, id: Uuid, patch: ProfilePatch) -> ApiResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET
                 name = COALESCE($2, name),
                 email = COALESCE($3, email),
                 interests = COALESCE($4, interests),
                 avatar_url = COALESCE($5, avatar_url),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(patch.name)
        .bind(patch.email)
        .bind(patch.interests)
        .bind(patch.avatar_url)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::db_or_conflict(e, EMAIL_TAKEN))
    }

    /// Replace the stored password hash.
    ///
    /// # Errors
    ///
    /// Database failures only.
    pub async fn set_password_hash(&self, id: Uuid, password_hash: &str) -> ApiResult<()> {
        sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(&self.pool)
            .await
            .map_err(AppError::db)?;
        Ok(())
    }

    /// Block or unblock an account.
    ///
    /// # Errors
    ///
    /// Database failures only; a missing row is `Ok(None)`.
    pub async fn set_blocked(&self, id: Uuid, blocked: bool) -> ApiResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET is_blocked = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(blocked)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::db)
    }
}
