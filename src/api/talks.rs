//! Conference programme endpoints (mounted under `/api/sessions`).

use crate::auth::{AuthUser, RequireStaff};
use crate::domain::Talk;
use crate::error::{ApiResult, AppError};
use crate::state::AppState;
use crate::store::talks::TalkFields;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Shortest talk the schedule accepts, in minutes.
const MIN_DURATION_MINUTES: i32 = 15;

/// Create/update payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TalkRequest {
    /// Title.
    pub title: String,
    /// Abstract.
    pub description: String,
    /// Speaker name.
    pub speaker: String,
    /// Room or stage.
    pub location: String,
    /// Scheduled start.
    pub date_time: DateTime<Utc>,
    /// Duration in minutes, at least 15.
    pub duration: i32,
    /// Optional illustration URL.
    pub image: Option<String>,
}

impl TalkRequest {
    fn validate(&self) -> ApiResult<()> {
        if self.title.trim().is_empty()
            || self.description.trim().is_empty()
            || self.speaker.trim().is_empty()
            || self.location.trim().is_empty()
        {
            return Err(AppError::bad_request("All fields are required"));
        }
        if self.duration < MIN_DURATION_MINUTES {
            return Err(AppError::bad_request(format!(
                "Duration must be at least {MIN_DURATION_MINUTES} minutes"
            )));
        }
        Ok(())
    }

    fn into_fields(self) -> TalkFields {
        TalkFields {
            title: self.title,
            description: self.description,
            speaker: self.speaker,
            location: self.location,
            starts_at: self.date_time,
            duration_minutes: self.duration,
            image_url: self.image,
        }
    }
}

/// Wrapper for a single talk.
#[derive(Debug, Serialize)]
pub struct TalkResponse {
    /// The talk.
    pub session: Talk,
}

/// Programme listing.
#[derive(Debug, Serialize)]
pub struct TalkListResponse {
    /// Talks in chronological order.
    pub sessions: Vec<Talk>,
}

/// `GET /api/sessions` — public programme.
///
/// # Errors
///
/// Database failures only.
pub async fn list_talks(State(state): State<AppState>) -> ApiResult<Json<TalkListResponse>> {
    let sessions = state.talks.list().await?;
    Ok(Json(TalkListResponse { sessions }))
}

/// `POST /api/sessions` — staff create.
///
/// # Errors
///
/// 400 on validation failures.
pub async fn create_talk(
    State(state): State<AppState>,
    RequireStaff(_): RequireStaff,
    Json(body): Json<TalkRequest>,
) -> ApiResult<(StatusCode, Json<TalkResponse>)> {
    body.validate()?;
    let session = state.talks.create(body.into_fields()).await?;
    Ok((StatusCode::CREATED, Json(TalkResponse { session })))
}

/// `PUT /api/sessions/:id` — staff update.
///
/// # Errors
///
/// 400 on validation failures, 404 for an unknown talk.
pub async fn update_talk(
    State(state): State<AppState>,
    RequireStaff(_): RequireStaff,
    Path(id): Path<Uuid>,
    Json(body): Json<TalkRequest>,
) -> ApiResult<Json<TalkResponse>> {
    body.validate()?;
    let session = state
        .talks
        .update(id, body.into_fields())
        .await?
        .ok_or_else(|| AppError::not_found("Session"))?;
    Ok(Json(TalkResponse { session }))
}

/// `DELETE /api/sessions/:id` — staff delete.
///
/// # Errors
///
/// 404 for an unknown talk.
pub async fn delete_talk(
    State(state): State<AppState>,
    RequireStaff(_): RequireStaff,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<super::auth::MessageResponse>> {
    if !state.talks.delete(id).await? {
        return Err(AppError::not_found("Session"));
    }
    Ok(Json(super::auth::MessageResponse {
        message: "Session deleted successfully".to_string(),
    }))
}

/// `POST /api/sessions/:id/bookmark` — any authenticated user; idempotent.
///
/// # Errors
///
/// 404 for an unknown talk.
pub async fn bookmark_talk(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<super::auth::MessageResponse>> {
    if !state.talks.exists(id).await? {
        return Err(AppError::not_found("Session"));
    }
    state.talks.add_bookmark(id, user.id).await?;
    Ok(Json(super::auth::MessageResponse {
        message: "Session bookmarked successfully".to_string(),
    }))
}

/// `DELETE /api/sessions/:id/bookmark`
///
/// # Errors
///
/// 404 for an unknown talk.
pub async fn unbookmark_talk(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<super::auth::MessageResponse>> {
    if !state.talks.exists(id).await? {
        return Err(AppError::not_found("Session"));
    }
    state.talks.remove_bookmark(id, user.id).await?;
    Ok(Json(super::auth::MessageResponse {
        message: "Bookmark removed successfully".to_string(),
    }))
}

/// `GET /api/sessions/bookmarks` — the caller's bookmarked talks.
///
/// # Errors
///
/// Database failures only.
pub async fn my_bookmarks(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<TalkListResponse>> {
    let sessions = state.talks.list_bookmarked(user.id).await?;
    Ok(Json(TalkListResponse { sessions }))
}
