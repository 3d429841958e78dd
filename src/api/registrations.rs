//! Registration workflow endpoints.
//!
//! Side effects (email + in-app notification) fire only after the state
//! transition has committed, always as detached best-effort tasks: a dead
//! SMTP server can never roll back an approval.

use crate::auth::{AuthUser, RequireAdmin, RequireStaff};
use crate::domain::{
    EventStatus, NotificationKind, Registration, RegistrationWithEvent, RegistrationWithParties,
    RelatedKind, Role, capacity_reached,
};
use crate::error::{ApiResult, AppError};
use crate::providers::send_in_background;
use crate::state::AppState;
use crate::store::DecisionOutcome;
use crate::store::registrations::{ALREADY_REGISTERED, CAPACITY_AT_REGISTER};
use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Deny payload.
#[derive(Debug, Deserialize)]
pub struct DenyRequest {
    /// Optional reason shown to the registrant.
    pub reason: Option<String>,
}

/// Check-in payload: the user scanned at the door.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInRequest {
    /// Registrant id from the ticket QR payload.
    pub user_id: Uuid,
}

/// Wrapper for a single registration.
#[derive(Debug, Serialize)]
pub struct RegistrationResponse {
    /// The registration.
    pub registration: Registration,
}

/// Registration plus a confirmation message.
#[derive(Debug, Serialize)]
pub struct RegistrationMessageResponse {
    /// The registration.
    pub registration: Registration,
    /// Human-readable confirmation.
    pub message: String,
}

/// The caller's registrations.
#[derive(Debug, Serialize)]
pub struct MyRegistrationsResponse {
    /// Registrations with event summaries.
    pub registrations: Vec<RegistrationWithEvent>,
}

/// Admin queue / participant list wrapper.
#[derive(Debug, Serialize)]
pub struct RegistrationListResponse {
    /// Registrations with both parties joined in.
    pub registrations: Vec<RegistrationWithParties>,
}

/// Participant list wrapper.
#[derive(Debug, Serialize)]
pub struct ParticipantsResponse {
    /// Registrations for the event with registrant identity.
    pub participants: Vec<RegistrationWithParties>,
}

/// `POST /api/registrations/:eventId/register` (`none -> pending`)
///
/// The duplicate check runs twice by design: a defensive lookup here for
/// the friendly common case, and the `(user_id, event_id)` unique
/// constraint as the authoritative guard under concurrency — both surface
/// the same conflict message. The capacity check here is advisory
/// fail-fast; the binding one happens at approval.
///
/// # Errors
///
/// 400 when the event is not open, already registered, or full.
pub async fn register(
    State(state): State<AppState>,
    user: AuthUser,
    Path(event_id): Path<Uuid>,
) -> ApiResult<(StatusCode, Json<RegistrationMessageResponse>)> {
    let event = state
        .events
        .find_by_id(event_id)
        .await?
        .filter(|e| e.status == EventStatus::Approved)
        .ok_or_else(|| AppError::bad_request("Event not available"))?;

    if state
        .registrations
        .find_for_user(user.id, event.id)
        .await?
        .is_some()
    {
        return Err(AppError::conflict(ALREADY_REGISTERED));
    }

    if event.capacity > 0 {
        let approved = state.registrations.count_approved(event.id).await?;
        if capacity_reached(event.capacity, approved) {
            return Err(AppError::conflict(CAPACITY_AT_REGISTER));
        }
    }

    let registration = state.registrations.insert_pending(user.id, event.id).await?;

    // Best-effort: the registrant hears about the pending request by email
    // and in-app; neither failure surfaces here.
    if let Some(account) = state.users.find_by_id(user.id).await? {
        send_in_background(
            state.mailer.clone(),
            account.email,
            format!("Registration Request: {}", event.title),
            format!(
                "<p>Your registration for {} is pending admin approval.</p>",
                event.title
            ),
        );
    }
    state.notifier.notify_in_background(
        user.id,
        "Registration Requested".to_string(),
        format!(
            "Your registration for {} is pending admin approval.",
            event.title
        ),
        NotificationKind::Info,
        Some((registration.id, RelatedKind::Registration)),
    );

    Ok((
        StatusCode::CREATED,
        Json(RegistrationMessageResponse {
            registration,
            message: "Registration request submitted. Awaiting admin approval.".to_string(),
        }),
    ))
}

/// `GET /api/registrations/me`
///
/// # Errors
///
/// Database failures only.
pub async fn my_registrations(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<MyRegistrationsResponse>> {
    let registrations = state.registrations.list_for_user(user.id).await?;
    Ok(Json(MyRegistrationsResponse { registrations }))
}

/// `GET /api/registrations/pending` — admin approval queue.
///
/// # Errors
///
/// Database failures only.
pub async fn pending_registrations(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
) -> ApiResult<Json<RegistrationListResponse>> {
    let registrations = state.registrations.list_pending().await?;
    Ok(Json(RegistrationListResponse { registrations }))
}

fn dispatch_decision_effects(state: &AppState, outcome: &DecisionOutcome, approved: bool) {
    let (subject, html, title, text, kind) = if approved {
        (
            format!("Registration Approved: {}", outcome.event.title),
            format!(
                "<p>Your registration for {} has been approved!</p><p>You can now download your ticket.</p>",
                outcome.event.title
            ),
            "Registration Approved".to_string(),
            format!("You were registered! Enjoy the event: {}", outcome.event.title),
            NotificationKind::Success,
        )
    } else {
        let reason_html = outcome
            .registration
            .denial_reason
            .as_deref()
            .map(|r| format!("<p>Reason: {r}</p>"))
            .unwrap_or_default();
        let reason_text = outcome
            .registration
            .denial_reason
            .as_deref()
            .map(|r| format!(" Reason: {r}"))
            .unwrap_or_default();
        (
            format!("Registration Denied: {}", outcome.event.title),
            format!(
                "<p>Your registration for {} has been denied.</p>{reason_html}",
                outcome.event.title
            ),
            "Registration Denied".to_string(),
            format!(
                "Your registration for {} was denied.{reason_text}",
                outcome.event.title
            ),
            NotificationKind::Error,
        )
    };

    send_in_background(
        state.mailer.clone(),
        outcome.user_email.clone(),
        subject,
        html,
    );
    state.notifier.notify_in_background(
        outcome.registration.user_id,
        title,
        text,
        kind,
        Some((outcome.registration.id, RelatedKind::Registration)),
    );
}

/// `POST /api/registrations/:id/approve` (`pending -> approved`, admin).
///
/// The store runs the authoritative capacity gate inside a transaction;
/// this handler only fires the side effects once the transition committed.
/// A non-pending registration fails before any side effect.
///
/// # Errors
///
/// 404 unknown id, 400 when already decided or the event is full.
pub async fn approve_registration(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<RegistrationMessageResponse>> {
    let outcome = state
        .registrations
        .approve(id, admin.id, state.qr.as_ref())
        .await?;

    dispatch_decision_effects(&state, &outcome, true);

    Ok(Json(RegistrationMessageResponse {
        registration: outcome.registration,
        message: "Registration approved successfully".to_string(),
    }))
}

/// `POST /api/registrations/:id/deny` (`pending -> denied`, admin).
///
/// # Errors
///
/// 404 unknown id, 400 when already decided.
pub async fn deny_registration(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<Uuid>,
    Json(body): Json<DenyRequest>,
) -> ApiResult<Json<RegistrationMessageResponse>> {
    let outcome = state
        .registrations
        .deny(id, admin.id, body.reason.as_deref())
        .await?;

    dispatch_decision_effects(&state, &outcome, false);

    Ok(Json(RegistrationMessageResponse {
        registration: outcome.registration,
        message: "Registration denied".to_string(),
    }))
}

/// Organizers only see their own events; admins see everything. Missing
/// and non-owned both come back as 404.
async fn require_event_access(state: &AppState, event_id: Uuid, user: &AuthUser) -> ApiResult<()> {
    let event = state
        .events
        .find_by_id(event_id)
        .await?
        .ok_or_else(|| AppError::not_found("Event"))?;
    if user.role != Role::Admin && event.organizer_id != user.id {
        return Err(AppError::not_found("Event"));
    }
    Ok(())
}

/// `POST /api/registrations/:eventId/checkin` (`approved -> attended`).
///
/// Addressed by (event, user) as scanned from the ticket QR; only an
/// approved registration can be checked in.
///
/// # Errors
///
/// 404 when there is no approved registration for the pair or the caller
/// does not control the event.
pub async fn check_in(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    Path(event_id): Path<Uuid>,
    Json(body): Json<CheckInRequest>,
) -> ApiResult<Json<RegistrationResponse>> {
    require_event_access(&state, event_id, &user).await?;

    let registration = state
        .registrations
        .check_in(event_id, body.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Registration"))?;

    Ok(Json(RegistrationResponse { registration }))
}

/// `GET /api/registrations/:eventId/participants`
///
/// # Errors
///
/// 404 when the caller does not control the event.
pub async fn participants(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    Path(event_id): Path<Uuid>,
) -> ApiResult<Json<ParticipantsResponse>> {
    require_event_access(&state, event_id, &user).await?;
    let participants = state.registrations.list_for_event(event_id).await?;
    Ok(Json(ParticipantsResponse { participants }))
}

/// `GET /api/registrations/:eventId/participants.csv`
///
/// # Errors
///
/// 404 when the caller does not control the event, 500 if CSV writing
/// fails.
pub async fn participants_csv(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    Path(event_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    require_event_access(&state, event_id, &user).await?;
    let rows = state.registrations.list_for_event(event_id).await?;

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(["Name", "Email", "Status", "Registered At"])
        .map_err(|e| AppError::internal(anyhow::Error::new(e).context("CSV write failed")))?;
    for row in &rows {
        writer
            .write_record([
                row.user_name.as_str(),
                row.user_email.as_str(),
                &row.registration.status.to_string(),
                &row.registration.created_at.to_rfc3339(),
            ])
            .map_err(|e| AppError::internal(anyhow::Error::new(e).context("CSV write failed")))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::internal(anyhow::Error::new(e).context("CSV flush failed")))?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"participants-{event_id}.csv\""),
            ),
        ],
        bytes,
    ))
}
