//! Feedback endpoints.

use crate::auth::{AuthUser, RequireAdmin};
use crate::domain::{Feedback, FeedbackWithUser};
use crate::error::{ApiResult, AppError};
use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

/// Submission payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    /// Feedback category (bug, suggestion, ...).
    #[serde(rename = "type")]
    pub kind: String,
    /// Subject line.
    pub subject: String,
    /// Body text.
    pub message: String,
}

/// Submission response.
#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    /// Confirmation.
    pub message: String,
    /// The stored submission.
    pub feedback: Feedback,
}

/// Admin listing response.
#[derive(Debug, Serialize)]
pub struct FeedbackListResponse {
    /// All submissions with author details, newest first.
    pub feedback: Vec<FeedbackWithUser>,
}

/// `POST /api/feedback` — any authenticated user.
///
/// # Errors
///
/// 400 when a field is missing.
pub async fn submit_feedback(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<FeedbackRequest>,
) -> ApiResult<(StatusCode, Json<FeedbackResponse>)> {
    if body.kind.trim().is_empty() || body.subject.trim().is_empty() || body.message.trim().is_empty()
    {
        return Err(AppError::bad_request("All fields are required"));
    }

    let feedback = state
        .feedback
        .insert(user.id, &body.kind, &body.subject, &body.message)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(FeedbackResponse {
            message: "Feedback submitted successfully".to_string(),
            feedback,
        }),
    ))
}

/// `GET /api/feedback` — admin only.
///
/// # Errors
///
/// Database failures only.
pub async fn list_feedback(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
) -> ApiResult<Json<FeedbackListResponse>> {
    let feedback = state.feedback.list_all().await?;
    Ok(Json(FeedbackListResponse { feedback }))
}
