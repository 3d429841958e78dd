//! Feedback repository.

use crate::domain::{Feedback, FeedbackWithUser};
use crate::error::{ApiResult, AppError};
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL-backed feedback repository.
#[derive(Clone)]
pub struct FeedbackStore {
    pool: PgPool,
}

impl FeedbackStore {
    /// Create a repository on the shared pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persist a submission.
    ///
    /// # Errors
    ///
    /// Database failures only.
    pub async fn insert(
        &self,
        user_id: Uuid,
        kind: &str,
        subject: &str,
        message: &str,
    ) -> ApiResult<Feedback> {
        sqlx::query_as::<_, Feedback>(
            "INSERT INTO feedback (id, user_id, kind, subject, message)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(kind)
        .bind(subject)
        .bind(message)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::db)
    }

    /// Every submission with author details, newest first. Admin view.
    ///
    /// # Errors
    ///
    /// Database failures only.
    pub async fn list_all(&self) -> ApiResult<Vec<FeedbackWithUser>> {
        sqlx::query_as::<_, FeedbackWithUser>(
            "SELECT f.*, u.name AS user_name, u.email AS user_email, u.role AS user_role
             FROM feedback f JOIN users u ON u.id = f.user_id
             ORDER BY f.created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::db)
    }
}
