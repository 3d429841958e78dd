//! Exhibitor endpoints.

use crate::auth::{AuthUser, RequireStaff};
use crate::domain::{Exhibitor, ExhibitorStatus};
use crate::error::{ApiResult, AppError};
use crate::state::AppState;
use crate::store::exhibitors::{ExhibitorPatch, NewExhibitor};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Create payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExhibitorRequest {
    /// Company name.
    pub company_name: String,
    /// Company description.
    pub description: String,
    /// Products shown.
    pub products: String,
    /// Category tag.
    pub category: String,
    /// Contact email.
    pub contact_email: String,
    /// Contact phone.
    pub contact_phone: Option<String>,
    /// Website URL.
    pub website: Option<String>,
    /// Logo URL.
    pub logo_url: Option<String>,
    /// Booth number.
    pub booth_number: Option<String>,
    /// Booth row.
    pub booth_row: Option<String>,
    /// Booth size class.
    pub booth_size: Option<String>,
}

/// Update payload; absent fields stay unchanged.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExhibitorRequest {
    /// New company name.
    pub company_name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New products.
    pub products: Option<String>,
    /// New category.
    pub category: Option<String>,
    /// New contact email.
    pub contact_email: Option<String>,
    /// New contact phone.
    pub contact_phone: Option<String>,
    /// New website.
    pub website: Option<String>,
    /// New logo URL.
    pub logo_url: Option<String>,
    /// New booth number.
    pub booth_number: Option<String>,
    /// New booth row.
    pub booth_row: Option<String>,
    /// New booth size.
    pub booth_size: Option<String>,
}

/// Status transition payload.
#[derive(Debug, Deserialize)]
pub struct ExhibitorStatusRequest {
    /// Target status.
    pub status: ExhibitorStatus,
}

/// Wrapper for a single exhibitor.
#[derive(Debug, Serialize)]
pub struct ExhibitorResponse {
    /// The exhibitor.
    pub exhibitor: Exhibitor,
}

/// Exhibitor listing.
#[derive(Debug, Serialize)]
pub struct ExhibitorListResponse {
    /// Exhibitors.
    pub exhibitors: Vec<Exhibitor>,
}

/// Status transition response.
#[derive(Debug, Serialize)]
pub struct ExhibitorStatusResponse {
    /// Confirmation.
    pub message: String,
    /// The exhibitor after the transition.
    pub exhibitor: Exhibitor,
}

/// `GET /api/exhibitors` — public, approved profiles only.
///
/// # Errors
///
/// Database failures only.
pub async fn list_approved(
    State(state): State<AppState>,
) -> ApiResult<Json<ExhibitorListResponse>> {
    let exhibitors = state.exhibitors.list_approved().await?;
    Ok(Json(ExhibitorListResponse { exhibitors }))
}

/// `GET /api/exhibitors/all` — staff view of every profile.
///
/// # Errors
///
/// Database failures only.
pub async fn list_all(
    State(state): State<AppState>,
    RequireStaff(_): RequireStaff,
) -> ApiResult<Json<ExhibitorListResponse>> {
    let exhibitors = state.exhibitors.list_all().await?;
    Ok(Json(ExhibitorListResponse { exhibitors }))
}

/// `GET /api/exhibitors/:id` — any authenticated user.
///
/// # Errors
///
/// 404 for an unknown id.
pub async fn get_exhibitor(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ExhibitorResponse>> {
    let exhibitor = state
        .exhibitors
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Exhibitor"))?;
    Ok(Json(ExhibitorResponse { exhibitor }))
}

/// `POST /api/exhibitors` — staff create; profiles start `pending`.
///
/// # Errors
///
/// 400 on validation failures.
pub async fn create_exhibitor(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    Json(body): Json<CreateExhibitorRequest>,
) -> ApiResult<(StatusCode, Json<ExhibitorResponse>)> {
    if body.company_name.trim().is_empty() {
        return Err(AppError::bad_request("Company name is required"));
    }
    if !crate::auth::is_valid_email(&body.contact_email) {
        return Err(AppError::bad_request("A valid contact email is required"));
    }

    let exhibitor = state
        .exhibitors
        .create(
            user.id,
            NewExhibitor {
                company_name: body.company_name,
                description: body.description,
                products: body.products,
                category: body.category,
                contact_email: body.contact_email,
                contact_phone: body.contact_phone,
                website: body.website,
                logo_url: body.logo_url,
                booth_number: body.booth_number,
                booth_row: body.booth_row,
                booth_size: body.booth_size,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(ExhibitorResponse { exhibitor })))
}

/// `PUT /api/exhibitors/:id` — staff update.
///
/// # Errors
///
/// 404 for an unknown id.
pub async fn update_exhibitor(
    State(state): State<AppState>,
    RequireStaff(_): RequireStaff,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateExhibitorRequest>,
) -> ApiResult<Json<ExhibitorResponse>> {
    let patch = ExhibitorPatch {
        company_name: body.company_name,
        description: body.description,
        products: body.products,
        category: body.category,
        contact_email: body.contact_email,
        contact_phone: body.contact_phone,
        website: body.website,
        logo_url: body.logo_url,
        booth_number: body.booth_number,
        booth_row: body.booth_row,
        booth_size: body.booth_size,
    };
    let exhibitor = state
        .exhibitors
        .update(id, patch)
        .await?
        .ok_or_else(|| AppError::not_found("Exhibitor"))?;
    Ok(Json(ExhibitorResponse { exhibitor }))
}

/// `POST /api/exhibitors/:id/status` — staff moderation.
///
/// # Errors
///
/// 404 for an unknown id.
pub async fn set_status(
    State(state): State<AppState>,
    RequireStaff(_): RequireStaff,
    Path(id): Path<Uuid>,
    Json(body): Json<ExhibitorStatusRequest>,
) -> ApiResult<Json<ExhibitorStatusResponse>> {
    let exhibitor = state
        .exhibitors
        .set_status(id, body.status)
        .await?
        .ok_or_else(|| AppError::not_found("Exhibitor"))?;

    let verb = match body.status {
        ExhibitorStatus::Approved => "approved",
        ExhibitorStatus::Rejected => "rejected",
        ExhibitorStatus::Pending => "set to pending",
    };
    Ok(Json(ExhibitorStatusResponse {
        message: format!("Exhibitor {verb} successfully"),
        exhibitor,
    }))
}

/// `DELETE /api/exhibitors/:id` — staff delete.
///
/// # Errors
///
/// 404 for an unknown id.
pub async fn delete_exhibitor(
    State(state): State<AppState>,
    RequireStaff(_): RequireStaff,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<super::auth::MessageResponse>> {
    if !state.exhibitors.delete(id).await? {
        return Err(AppError::not_found("Exhibitor"));
    }
    Ok(Json(super::auth::MessageResponse {
        message: "Exhibitor deleted successfully".to_string(),
    }))
}
