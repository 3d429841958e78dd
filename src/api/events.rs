//! Event endpoints: CRUD and the filtered listing.

use crate::auth::RequireStaff;
use crate::domain::{Event, EventStatus, EventWithOrganizer, Page, Pagination};
use crate::error::{ApiResult, AppError};
use crate::state::AppState;
use crate::store::EventFilter;
use crate::store::events::{EventPatch, NewEvent};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Create payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Category tag.
    pub category: String,
    /// When the event takes place.
    pub date: DateTime<Utc>,
    /// Venue.
    pub location: String,
    /// Approved-registration ceiling; `0` or absent = unlimited.
    pub capacity: Option<i32>,
    /// Optional poster URL.
    pub poster_url: Option<String>,
}

/// Update payload; absent fields stay unchanged.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New category.
    pub category: Option<String>,
    /// New date.
    pub date: Option<DateTime<Utc>>,
    /// New location.
    pub location: Option<String>,
    /// New capacity.
    pub capacity: Option<i32>,
    /// New poster URL.
    pub poster_url: Option<String>,
}

/// Listing query parameters.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEventsQuery {
    /// Free-text search over title and description.
    pub q: Option<String>,
    /// Exact category.
    pub category: Option<String>,
    /// Exact status.
    pub status: Option<EventStatus>,
    /// Exact organizer id.
    pub organizer: Option<Uuid>,
    /// Inclusive lower date bound.
    pub date_from: Option<DateTime<Utc>>,
    /// Inclusive upper date bound.
    pub date_to: Option<DateTime<Utc>>,
    /// Sort column (whitelisted).
    pub sort_by: Option<String>,
    /// `asc` (default) or `desc`.
    pub sort_order: Option<String>,
    /// 1-indexed page.
    pub page: Option<i64>,
    /// Page size.
    pub limit: Option<i64>,
}

/// Wrapper for a single event.
#[derive(Debug, Serialize)]
pub struct EventResponse {
    /// The event.
    pub event: Event,
}

/// Listing response with pagination metadata.
#[derive(Debug, Serialize)]
pub struct ListEventsResponse {
    /// Matching events for this page.
    pub events: Vec<EventWithOrganizer>,
    /// Pagination metadata.
    pub pagination: Pagination,
}

/// Event detail with its live registration count.
#[derive(Debug, Serialize)]
pub struct EventDetailResponse {
    /// The event with organizer name.
    pub event: EventWithOrganizer,
    /// Non-cancelled registrations.
    pub registrations: i64,
}

/// `POST /api/events` — staff create; new events always start `pending`.
///
/// # Errors
///
/// 400 on validation failures.
pub async fn create_event(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    Json(body): Json<CreateEventRequest>,
) -> ApiResult<(StatusCode, Json<EventResponse>)> {
    if body.title.trim().is_empty() {
        return Err(AppError::bad_request("Title is required"));
    }
    let capacity = body.capacity.unwrap_or(0);
    if capacity < 0 {
        return Err(AppError::bad_request("Capacity cannot be negative"));
    }

    let event = state
        .events
        .create(
            user.id,
            NewEvent {
                title: body.title.trim().to_string(),
                description: body.description,
                category: body.category,
                date: body.date,
                location: body.location,
                capacity,
                poster_url: body.poster_url,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(EventResponse { event })))
}

/// `GET /api/events` — public filtered listing.
///
/// An empty filter set matches every event; defaults sort by date
/// ascending, page 1, ten per page.
///
/// # Errors
///
/// Database failures only.
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<ListEventsQuery>,
) -> ApiResult<Json<ListEventsResponse>> {
    let page = Page::new(query.page, query.limit);
    let filter = EventFilter {
        q: query.q,
        category: query.category,
        status: query.status,
        organizer: query.organizer,
        date_from: query.date_from,
        date_to: query.date_to,
        sort_by: query.sort_by,
        descending: query.sort_order.as_deref() == Some("desc"),
    };

    let (events, total) = state.events.list(&filter, page).await?;

    Ok(Json(ListEventsResponse {
        events,
        pagination: Pagination::compute(total, page),
    }))
}

/// `GET /api/events/:id` — public detail plus live registration count.
///
/// # Errors
///
/// 404 for an unknown id.
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<EventDetailResponse>> {
    let event = state
        .events
        .find_with_organizer(id)
        .await?
        .ok_or_else(|| AppError::not_found("Event"))?;
    let registrations = state.registrations.count_active(id).await?;

    Ok(Json(EventDetailResponse {
        event,
        registrations,
    }))
}

/// `PUT /api/events/:id` — owner update.
///
/// Ownership sits inside the lookup predicate: someone else's event id
/// yields the same 404 as a missing one.
///
/// # Errors
///
/// 404 for unknown or non-owned events.
pub async fn update_event(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateEventRequest>,
) -> ApiResult<Json<EventResponse>> {
    if let Some(capacity) = body.capacity {
        if capacity < 0 {
            return Err(AppError::bad_request("Capacity cannot be negative"));
        }
    }

    let patch = EventPatch {
        title: body.title,
        description: body.description,
        category: body.category,
        date: body.date,
        location: body.location,
        capacity: body.capacity,
        poster_url: body.poster_url,
    };
    let event = state
        .events
        .update_owned(id, user.id, patch)
        .await?
        .ok_or_else(|| AppError::not_found("Event"))?;

    Ok(Json(EventResponse { event }))
}

/// `DELETE /api/events/:id` — owner delete, same ownership predicate.
///
/// # Errors
///
/// 404 for unknown or non-owned events.
pub async fn delete_event(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<super::auth::MessageResponse>> {
    if !state.events.delete_owned(id, user.id).await? {
        return Err(AppError::not_found("Event"));
    }
    Ok(Json(super::auth::MessageResponse {
        message: "Deleted".to_string(),
    }))
}
