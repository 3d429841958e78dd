//! Notification endpoints, all scoped to the calling user.

use crate::auth::AuthUser;
use crate::domain::Notification;
use crate::error::{ApiResult, AppError};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Listing query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ListNotificationsQuery {
    /// Max rows (default 50).
    pub limit: Option<i64>,
    /// Rows to skip (default 0).
    pub offset: Option<i64>,
    /// Filter by read state.
    pub read: Option<bool>,
}

/// Listing response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationListResponse {
    /// Notifications, newest first.
    pub notifications: Vec<Notification>,
    /// Unread total across all pages.
    pub unread_count: i64,
    /// Echoed offset.
    pub offset: i64,
    /// Echoed limit.
    pub limit: i64,
}

/// Wrapper for a single notification.
#[derive(Debug, Serialize)]
pub struct NotificationResponse {
    /// The notification.
    pub notification: Notification,
}

/// `GET /api/notifications`
///
/// # Errors
///
/// Database failures only.
pub async fn list_notifications(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ListNotificationsQuery>,
) -> ApiResult<Json<NotificationListResponse>> {
    let limit = query.limit.unwrap_or(50).clamp(1, 200);
    let offset = query.offset.unwrap_or(0).max(0);

    let notifications = state
        .notifications
        .list_for_user(user.id, query.read, limit, offset)
        .await?;
    let unread_count = state.notifications.unread_count(user.id).await?;

    Ok(Json(NotificationListResponse {
        notifications,
        unread_count,
        offset,
        limit,
    }))
}

/// `POST /api/notifications/:id/read`
///
/// # Errors
///
/// 404 for unknown or non-owned notifications.
pub async fn mark_read(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<NotificationResponse>> {
    let notification = state
        .notifications
        .set_read(id, user.id, true)
        .await?
        .ok_or_else(|| AppError::not_found("Notification"))?;
    Ok(Json(NotificationResponse { notification }))
}

/// `POST /api/notifications/:id/unread`
///
/// # Errors
///
/// 404 for unknown or non-owned notifications.
pub async fn mark_unread(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<NotificationResponse>> {
    let notification = state
        .notifications
        .set_read(id, user.id, false)
        .await?
        .ok_or_else(|| AppError::not_found("Notification"))?;
    Ok(Json(NotificationResponse { notification }))
}

/// `POST /api/notifications/read-all`
///
/// # Errors
///
/// Database failures only.
pub async fn mark_all_read(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<super::auth::MessageResponse>> {
    state.notifications.mark_all_read(user.id).await?;
    Ok(Json(super::auth::MessageResponse {
        message: "All notifications marked as read".to_string(),
    }))
}

/// `DELETE /api/notifications/:id`
///
/// # Errors
///
/// 404 for unknown or non-owned notifications.
pub async fn delete_notification(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<super::auth::MessageResponse>> {
    if !state.notifications.delete_owned(id, user.id).await? {
        return Err(AppError::not_found("Notification"));
    }
    Ok(Json(super::auth::MessageResponse {
        message: "Notification deleted successfully".to_string(),
    }))
}

/// `DELETE /api/notifications/read/all`
///
/// # Errors
///
/// Database failures only.
pub async fn delete_all_read(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<super::auth::MessageResponse>> {
    let deleted = state.notifications.delete_read(user.id).await?;
    Ok(Json(super::auth::MessageResponse {
        message: format!("Deleted {deleted} notifications"),
    }))
}
