//! Admin moderation endpoints: event approval and user blocking.

use crate::auth::RequireAdmin;
use crate::domain::{Event, EventStatus, EventWithOrganizer, UserPublic};
use crate::error::{ApiResult, AppError};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use uuid::Uuid;

/// Moderated event plus a confirmation.
#[derive(Debug, Serialize)]
pub struct ModeratedEventResponse {
    /// The event after the transition.
    pub event: Event,
    /// Confirmation.
    pub message: String,
}

/// Pending-event queue.
#[derive(Debug, Serialize)]
pub struct PendingEventsResponse {
    /// Pending events, oldest first.
    pub events: Vec<EventWithOrganizer>,
}

/// Blocked/unblocked user plus a confirmation.
#[derive(Debug, Serialize)]
pub struct ModeratedUserResponse {
    /// The user after the change.
    pub user: UserPublic,
    /// Confirmation.
    pub message: String,
}

/// `GET /api/admin/events/pending`
///
/// # Errors
///
/// Database failures only.
pub async fn pending_events(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
) -> ApiResult<Json<PendingEventsResponse>> {
    let events = state.events.list_pending().await?;
    Ok(Json(PendingEventsResponse { events }))
}

/// `POST /api/admin/events/:id/approve` (`pending -> approved`).
///
/// Moderation is one-way: an event decided once cannot be moved again.
///
/// # Errors
///
/// 404 unknown id, 400 when already decided.
pub async fn approve_event(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ModeratedEventResponse>> {
    let event = state.events.moderate(id, EventStatus::Approved).await?;
    Ok(Json(ModeratedEventResponse {
        event,
        message: "Event approved".to_string(),
    }))
}

/// `POST /api/admin/events/:id/reject` (`pending -> rejected`).
///
/// # Errors
///
/// 404 unknown id, 400 when already decided.
pub async fn reject_event(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ModeratedEventResponse>> {
    let event = state.events.moderate(id, EventStatus::Rejected).await?;
    Ok(Json(ModeratedEventResponse {
        event,
        message: "Event rejected".to_string(),
    }))
}

/// `POST /api/admin/users/:id/block`
///
/// A blocked user keeps their data but fails every subsequent login with
/// 403, credentials notwithstanding.
///
/// # Errors
///
/// 404 for an unknown user.
pub async fn block_user(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ModeratedUserResponse>> {
    let user = state
        .users
        .set_blocked(id, true)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;
    Ok(Json(ModeratedUserResponse {
        user: user.into(),
        message: "User blocked".to_string(),
    }))
}

/// `POST /api/admin/users/:id/unblock`
///
/// # Errors
///
/// 404 for an unknown user.
pub async fn unblock_user(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ModeratedUserResponse>> {
    let user = state
        .users
        .set_blocked(id, false)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;
    Ok(Json(ModeratedUserResponse {
        user: user.into(),
        message: "User unblocked".to_string(),
    }))
}
