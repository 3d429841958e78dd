//! Review repository.
//!
//! Writes never leave `events.average_rating` stale: every insert, update,
//! and delete is followed by a recomputation through
//! [`crate::store::EventStore::refresh_average_rating`], driven by the
//! handler so both stores stay single-purpose.

use crate::domain::{Review, ReviewWithAuthor, ReviewWithEvent};
use crate::error::{ApiResult, AppError};
use sqlx::PgPool;
use uuid::Uuid;

/// Conflict message shared by the defensive duplicate check and the unique
/// constraint on `(user_id, event_id)`.
pub const ALREADY_REVIEWED: &str =
    "You have already reviewed this event. You can only post one review per event.";

/// PostgreSQL-backed review repository.
#[derive(Clone)]
pub struct ReviewStore {
    pool: PgPool,
}

impl ReviewStore {
    /// Create a repository on the shared pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Whether the user already reviewed this event.
    ///
    /// # Errors
    ///
    /// Database failures only.
    pub async fn exists(&self, user_id: Uuid, event_id: Uuid) -> ApiResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM reviews WHERE user_id = $1 AND event_id = $2)",
        )
        .bind(user_id)
        .bind(event_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::db)
    }

    /// Insert a review.
    ///
    /// # Errors
    ///
    /// Maps a duplicate (user, event) pair to [`ALREADY_REVIEWED`].
    pub async fn insert(
        &self,
        user_id: Uuid,
        event_id: Uuid,
        rating: i32,
        comment: Option<&str>,
    ) -> ApiResult<Review> {
        sqlx::query_as::<_, Review>(
            "INSERT INTO reviews (id, user_id, event_id, rating, comment)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(event_id)
        .bind(rating)
        .bind(comment)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::db_or_conflict(e, ALREADY_REVIEWED))
    }

    /// Update a review, but only for its author. Non-authored ids behave
    /// like missing ones.
    ///
    /// # Errors
    ///
    /// Database failures only.
    pub async fn update_owned(
        &self,
        id: Uuid,
        author_id: Uuid,
        rating: i32,
        comment: Option<&str>,
    ) -> ApiResult<Option<Review>> {
        sqlx::query_as::<_, Review>(
            "UPDATE reviews SET rating = $3, comment = $4, updated_at = NOW()
             WHERE id = $1 AND user_id = $2
             RETURNING *",
        )
        .bind(id)
        .bind(author_id)
        .bind(rating)
        .bind(comment)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::db)
    }

    /// Delete a review under the same author predicate; returns the deleted
    /// row so the caller can recompute the event aggregate.
    ///
    /// # Errors
    ///
    /// Database failures only.
    pub async fn delete_owned(&self, id: Uuid, author_id: Uuid) -> ApiResult<Option<Review>> {
        sqlx::query_as::<_, Review>(
            "DELETE FROM reviews WHERE id = $1 AND user_id = $2 RETURNING *",
        )
        .bind(id)
        .bind(author_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::db)
    }

    /// All reviews for an event with author names, newest first.
    ///
    /// # Errors
    ///
    /// Database failures only.
    pub async fn list_for_event(&self, event_id: Uuid) -> ApiResult<Vec<ReviewWithAuthor>> {
        sqlx::query_as::<_, ReviewWithAuthor>(
            "SELECT r.*, u.name AS user_name
             FROM reviews r JOIN users u ON u.id = r.user_id
             WHERE r.event_id = $1
             ORDER BY r.created_at DESC",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::db)
    }

    /// All reviews written by one user, with event titles.
    ///
    /// # Errors
    ///
    /// Database failures only.
    pub async fn list_for_user(&self, user_id: Uuid) -> ApiResult<Vec<ReviewWithEvent>> {
        sqlx::query_as::<_, ReviewWithEvent>(
            "SELECT r.*, e.title AS event_title
             FROM reviews r JOIN events e ON e.id = r.event_id
             WHERE r.user_id = $1
             ORDER BY r.created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::db)
    }
}
