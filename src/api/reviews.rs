//! Review endpoints.
//!
//! Every write ends by refreshing the event's denormalized average rating,
//! so listings read the aggregate in O(1).

use crate::auth::AuthUser;
use crate::domain::{Review, ReviewWithAuthor, ReviewWithEvent};
use crate::error::{ApiResult, AppError};
use crate::state::AppState;
use crate::store::reviews::ALREADY_REVIEWED;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Review payload for create and update.
#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    /// Rating, 1 to 5 inclusive.
    pub rating: i32,
    /// Optional free-text comment.
    pub comment: Option<String>,
}

/// Wrapper for a single review.
#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    /// The review.
    pub review: Review,
}

/// Reviews of one event.
#[derive(Debug, Serialize)]
pub struct ReviewListResponse {
    /// Reviews with author names.
    pub reviews: Vec<ReviewWithAuthor>,
}

/// The caller's own reviews.
#[derive(Debug, Serialize)]
pub struct MyReviewsResponse {
    /// Reviews with event titles.
    pub reviews: Vec<ReviewWithEvent>,
}

fn check_rating(rating: i32) -> ApiResult<()> {
    if !(1..=5).contains(&rating) {
        return Err(AppError::bad_request("Rating must be between 1 and 5"));
    }
    Ok(())
}

/// `POST /api/reviews/:eventId` — one review per (user, event).
///
/// Duplicate protection is layered like registrations: a defensive lookup
/// plus the unique constraint, both mapped to [`ALREADY_REVIEWED`].
///
/// # Errors
///
/// 400 on an out-of-range rating or duplicate review, 404 for an unknown
/// event.
pub async fn add_review(
    State(state): State<AppState>,
    user: AuthUser,
    Path(event_id): Path<Uuid>,
    Json(body): Json<ReviewRequest>,
) -> ApiResult<(StatusCode, Json<ReviewResponse>)> {
    check_rating(body.rating)?;

    if state.events.find_by_id(event_id).await?.is_none() {
        return Err(AppError::not_found("Event"));
    }
    if state.reviews.exists(user.id, event_id).await? {
        return Err(AppError::conflict(ALREADY_REVIEWED));
    }

    let review = state
        .reviews
        .insert(user.id, event_id, body.rating, body.comment.as_deref())
        .await?;
    state.events.refresh_average_rating(event_id).await?;

    Ok((StatusCode::CREATED, Json(ReviewResponse { review })))
}

/// `PUT /api/reviews/:id` — author-scoped update.
///
/// # Errors
///
/// 400 on an out-of-range rating, 404 for unknown or non-authored reviews.
pub async fn update_review(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<ReviewRequest>,
) -> ApiResult<Json<ReviewResponse>> {
    check_rating(body.rating)?;

    let review = state
        .reviews
        .update_owned(id, user.id, body.rating, body.comment.as_deref())
        .await?
        .ok_or_else(|| AppError::not_found("Review"))?;
    state.events.refresh_average_rating(review.event_id).await?;

    Ok(Json(ReviewResponse { review }))
}

/// `DELETE /api/reviews/:id` — author-scoped delete.
///
/// # Errors
///
/// 404 for unknown or non-authored reviews.
pub async fn delete_review(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<super::auth::MessageResponse>> {
    let review = state
        .reviews
        .delete_owned(id, user.id)
        .await?
        .ok_or_else(|| AppError::not_found("Review"))?;
    state.events.refresh_average_rating(review.event_id).await?;

    Ok(Json(super::auth::MessageResponse {
        message: "Review deleted successfully".to_string(),
    }))
}

/// `GET /api/reviews/:eventId` — public listing.
///
/// # Errors
///
/// Database failures only.
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> ApiResult<Json<ReviewListResponse>> {
    let reviews = state.reviews.list_for_event(event_id).await?;
    Ok(Json(ReviewListResponse { reviews }))
}

/// `GET /api/reviews/user/me` — the caller's reviews.
///
/// # Errors
///
/// Database failures only.
pub async fn my_reviews(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<MyReviewsResponse>> {
    let reviews = state.reviews.list_for_user(user.id).await?;
    Ok(Json(MyReviewsResponse { reviews }))
}
