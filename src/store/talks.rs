//! Conference talk repository, including per-user bookmarks.

use crate::domain::Talk;
use crate::error::{ApiResult, AppError};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Fields for a new or fully updated talk.
#[derive(Debug, Clone)]
pub struct TalkFields {
    /// Title.
    pub title: String,
    /// Abstract.
    pub description: String,
    /// Speaker name.
    pub speaker: String,
    /// Room or stage.
    pub location: String,
    /// Scheduled start.
    pub starts_at: DateTime<Utc>,
    /// Duration in minutes.
    pub duration_minutes: i32,
    /// Optional illustration URL.
    pub image_url: Option<String>,
}

/// PostgreSQL-backed talk repository.
#[derive(Clone)]
pub struct TalkStore {
    pool: PgPool,
}

impl TalkStore {
    /// Create a repository on the shared pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Full programme, chronological.
    ///
    /// # Errors
    ///
    /// Database failures only.
    pub async fn list(&self) -> ApiResult<Vec<Talk>> {
        sqlx::query_as::<_, Talk>("SELECT * FROM talks ORDER BY starts_at ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::db)
    }

    /// Insert a talk.
    ///
    /// # Errors
    ///
    /// Database failures only.
    pub async fn create(&self, fields: TalkFields) -> ApiResult<Talk> {
        sqlx::query_as::<_, Talk>(
            "INSERT INTO talks
                 (id, title, description, speaker, location, starts_at, duration_minutes, image_url)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(fields.title)
        .bind(fields.description)
        .bind(fields.speaker)
        .bind(fields.location)
        .bind(fields.starts_at)
        .bind(fields.duration_minutes)
        .bind(fields.image_url)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::db)
    }

    /// Replace a talk's fields.
    ///
    /// # Errors
    ///
    /// Database failures only; a missing row is `Ok(None)`.
    pub async fn update(&self, id: Uuid, fields: TalkFields) -> ApiResult<Option<Talk>> {
        sqlx::query_as::<_, Talk>(
            "UPDATE talks SET
                 title = $2, description = $3, speaker = $4, location = $5,
                 starts_at = $6, duration_minutes = $7,
                 image_url = COALESCE($8, image_url),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(fields.title)
        .bind(fields.description)
        .bind(fields.speaker)
        .bind(fields.location)
        .bind(fields.starts_at)
        .bind(fields.duration_minutes)
        .bind(fields.image_url)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::db)
    }

    /// Delete a talk (bookmarks cascade).
    ///
    /// # Errors
    ///
    /// Database failures only.
    pub async fn delete(&self, id: Uuid) -> ApiResult<bool> {
        let result = sqlx::query("DELETE FROM talks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::db)?;
        Ok(result.rows_affected() > 0)
    }

    /// Whether the talk exists.
    ///
    /// # Errors
    ///
    /// Database failures only.
    pub async fn exists(&self, id: Uuid) -> ApiResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM talks WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::db)
    }

    /// Bookmark a talk for a user. Idempotent.
    ///
    /// # Errors
    ///
    /// Database failures only.
    pub async fn add_bookmark(&self, talk_id: Uuid, user_id: Uuid) -> ApiResult<()> {
        sqlx::query(
            "INSERT INTO talk_bookmarks (talk_id, user_id)
             VALUES ($1, $2)
             ON CONFLICT DO NOTHING",
        )
        .bind(talk_id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(AppError::db)?;
        Ok(())
    }

    /// Remove a bookmark. Removing one that does not exist is a no-op.
    ///
    /// # Errors
    ///
    /// Database failures only.
    pub async fn remove_bookmark(&self, talk_id: Uuid, user_id: Uuid) -> ApiResult<()> {
        sqlx::query("DELETE FROM talk_bookmarks WHERE talk_id = $1 AND user_id = $2")
            .bind(talk_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::db)?;
        Ok(())
    }

    /// All talks a user bookmarked, chronological.
    ///
    /// # Errors
    ///
    /// Database failures only.
    pub async fn list_bookmarked(&self, user_id: Uuid) -> ApiResult<Vec<Talk>> {
        sqlx::query_as::<_, Talk>(
            "SELECT t.* FROM talks t
             JOIN talk_bookmarks b ON b.talk_id = t.id
             WHERE b.user_id = $1
             ORDER BY t.starts_at ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::db)
    }
}
