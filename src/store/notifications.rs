//! Notification repository.

use crate::domain::{Notification, NotificationKind, RelatedKind};
use crate::error::{ApiResult, AppError};
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL-backed notification repository.
#[derive(Clone)]
pub struct NotificationStore {
    pool: PgPool,
}

impl NotificationStore {
    /// Create a repository on the shared pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persist a notification.
    ///
    /// # Errors
    ///
    /// Database failures only.
    pub async fn insert(
        &self,
        user_id: Uuid,
        title: &str,
        message: &str,
        kind: NotificationKind,
        related: Option<(Uuid, RelatedKind)>,
    ) -> ApiResult<Notification> {
        let (related_id, related_type) = match related {
            Some((id, kind)) => (Some(id), Some(kind)),
            None => (None, None),
        };
        sqlx::query_as::<_, Notification>(
            "INSERT INTO notifications (id, user_id, title, message, kind, related_id, related_type)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(title)
        .bind(message)
        .bind(kind)
        .bind(related_id)
        .bind(related_type)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::db)
    }

    /// A user's notifications, newest first, optionally filtered by read
    /// state.
    ///
    /// # Errors
    ///
    /// Database failures only.
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        read: Option<bool>,
        limit: i64,
        offset: i64,
    ) -> ApiResult<Vec<Notification>> {
        sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications
             WHERE user_id = $1 AND ($2::boolean IS NULL OR read = $2)
             ORDER BY created_at DESC
             LIMIT $3 OFFSET $4",
        )
        .bind(user_id)
        .bind(read)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::db)
    }

    /// Number of unread notifications for a user.
    ///
    /// # Errors
    ///
    /// Database failures only.
    pub async fn unread_count(&self, user_id: Uuid) -> ApiResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND NOT read",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::db)
    }

    /// Mark one notification read or unread, owner-scoped.
    ///
    /// # Errors
    ///
    /// Database failures only; a non-owned id is `Ok(None)`.
    pub async fn set_read(
        &self,
        id: Uuid,
        user_id: Uuid,
        read: bool,
    ) -> ApiResult<Option<Notification>> {
        sqlx::query_as::<_, Notification>(
            "UPDATE notifications SET read = $3 WHERE id = $1 AND user_id = $2 RETURNING *",
        )
        .bind(id)
        .bind(user_id)
        .bind(read)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::db)
    }

    /// Mark all of a user's notifications read.
    ///
    /// # Errors
    ///
    /// Database failures only.
    pub async fn mark_all_read(&self, user_id: Uuid) -> ApiResult<()> {
        sqlx::query("UPDATE notifications SET read = TRUE WHERE user_id = $1 AND NOT read")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::db)?;
        Ok(())
    }

    /// Delete one notification, owner-scoped.
    ///
    /// # Errors
    ///
    /// Database failures only.
    pub async fn delete_owned(&self, id: Uuid, user_id: Uuid) -> ApiResult<bool> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::db)?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete all read notifications; returns how many were removed.
    ///
    /// # Errors
    ///
    /// Database failures only.
    pub async fn delete_read(&self, user_id: Uuid) -> ApiResult<u64> {
        let result = sqlx::query("DELETE FROM notifications WHERE user_id = $1 AND read")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::db)?;
        Ok(result.rows_affected())
    }
}
