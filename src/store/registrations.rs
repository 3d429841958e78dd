//! Registration repository and the approval state machine.
//!
//! The approve path is the one place where correctness depends on ordering:
//! capacity is defined over *approved* registrations, and concurrent admins
//! may race to approve against the same ceiling. The whole transition runs
//! in a transaction that locks the registration and its event row
//! (`SELECT ... FOR UPDATE`), recounts approved seats under the lock, and
//! only then commits — so capacity can never be oversold.

use crate::domain::{
    Event, Registration, RegistrationWithEvent, RegistrationWithParties, capacity_reached,
};
use crate::error::{ApiResult, AppError};
use crate::providers::QrGenerator;
use sqlx::PgPool;
use uuid::Uuid;

/// Conflict message shared by the defensive duplicate check and the unique
/// constraint on `(user_id, event_id)`.
pub const ALREADY_REGISTERED: &str = "You have already registered for this event";

/// Capacity refusal at registration time (fail-fast, advisory).
pub const CAPACITY_AT_REGISTER: &str = "Event capacity reached. No more registrations allowed.";

/// Capacity refusal at approval time (the authoritative gate).
pub const CAPACITY_AT_APPROVE: &str = "Event capacity reached. Cannot approve more registrations.";

/// An approve/deny decision together with the context the caller needs for
/// side effects (email, notification).
#[derive(Debug, Clone)]
pub struct DecisionOutcome {
    /// The registration after the transition.
    pub registration: Registration,
    /// The target event.
    pub event: Event,
    /// Registrant display name.
    pub user_name: String,
    /// Registrant email.
    pub user_email: String,
}

/// PostgreSQL-backed registration repository.
#[derive(Clone)]
pub struct RegistrationStore {
    pool: PgPool,
}

impl RegistrationStore {
    /// Create a repository on the shared pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Existing registration for a (user, event) pair, any status.
    ///
    /// # Errors
    ///
    /// Database failures only.
    pub async fn find_for_user(
        &self,
        user_id: Uuid,
        event_id: Uuid,
    ) -> ApiResult<Option<Registration>> {
        sqlx::query_as::<_, Registration>(
            "SELECT * FROM registrations WHERE user_id = $1 AND event_id = $2",
        )
        .bind(user_id)
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::db)
    }

    /// Number of approved registrations for an event.
    ///
    /// # Errors
    ///
    /// Database failures only.
    pub async fn count_approved(&self, event_id: Uuid) -> ApiResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM registrations WHERE event_id = $1 AND status = 'approved'",
        )
        .bind(event_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::db)
    }

    /// Number of non-cancelled registrations for an event (shown on the
    /// event detail page).
    ///
    /// # Errors
    ///
    /// Database failures only.
    pub async fn count_active(&self, event_id: Uuid) -> ApiResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM registrations WHERE event_id = $1 AND status <> 'cancelled'",
        )
        .bind(event_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::db)
    }

    /// Insert a pending registration.
    ///
    /// The unique constraint is the authoritative duplicate guard; its
    /// violation surfaces as the same conflict as the defensive pre-check.
    ///
    /// # Errors
    ///
    /// Maps a duplicate pair to [`ALREADY_REGISTERED`].
    pub async fn insert_pending(&self, user_id: Uuid, event_id: Uuid) -> ApiResult<Registration> {
        sqlx::query_as::<_, Registration>(
            "INSERT INTO registrations (id, user_id, event_id, status)
             VALUES ($1, $2, $3, 'pending')
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(event_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::db_or_conflict(e, ALREADY_REGISTERED))
    }

    /// Approve a pending registration (`pending -> approved`).
    ///
    /// Runs entirely inside one transaction:
    /// 1. lock the registration row; reject unless still `pending`
    /// 2. lock the event row; recount approved seats and enforce capacity
    /// 3. render the ticket QR and persist the transition
    ///
    /// # Errors
    ///
    /// 404 for an unknown id, 400 when already decided or when the event is
    /// full, 500 on database or QR failures.
    pub async fn approve(
        &self,
        id: Uuid,
        admin_id: Uuid,
        qr: &dyn QrGenerator,
    ) -> ApiResult<DecisionOutcome> {
        let mut tx = self.pool.begin().await.map_err(AppError::db)?;

        let registration = sqlx::query_as::<_, Registration>(
            "SELECT * FROM registrations WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::db)?
        .ok_or_else(|| AppError::not_found("Registration"))?;

        if !registration.status.is_decidable() {
            return Err(AppError::bad_request(format!(
                "Registration is already {}",
                registration.status
            )));
        }

        // Lock the event row so concurrent approvals for the same event
        // serialize here, then recount under the lock.
        let event =
            sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1 FOR UPDATE")
                .bind(registration.event_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(AppError::db)?
                .ok_or_else(|| AppError::not_found("Event"))?;

        if event.capacity > 0 {
            let approved: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM registrations WHERE event_id = $1 AND status = 'approved'",
            )
            .bind(event.id)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::db)?;

            if capacity_reached(event.capacity, approved) {
                return Err(AppError::conflict(CAPACITY_AT_APPROVE));
            }
        }

        let payload = serde_json::json!({
            "userId": registration.user_id,
            "eventId": registration.event_id,
            "at": chrono::Utc::now().timestamp_millis(),
        })
        .to_string();
        let qr_code_data_url = qr
            .data_url(&payload)
            .map_err(|e| AppError::internal(e.context("QR rendering failed")))?;

        let registration = sqlx::query_as::<_, Registration>(
            "UPDATE registrations SET
                 status = 'approved',
                 qr_code_data_url = $2,
                 approved_by = $3,
                 approved_at = NOW(),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(&qr_code_data_url)
        .bind(admin_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::db)?;

        let (user_name, user_email) = sqlx::query_as::<_, (String, String)>(
            "SELECT name, email FROM users WHERE id = $1",
        )
        .bind(registration.user_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::db)?;

        tx.commit().await.map_err(AppError::db)?;

        Ok(DecisionOutcome {
            registration,
            event,
            user_name,
            user_email,
        })
    }

    /// Deny a pending registration (`pending -> denied`).
    ///
    /// Uses the same row lock as approval so two admins cannot decide the
    /// same registration twice.
    ///
    /// # Errors
    ///
    /// 404 for an unknown id, 400 when already decided.
    pub async fn deny(
        &self,
        id: Uuid,
        admin_id: Uuid,
        reason: Option<&str>,
    ) -> ApiResult<DecisionOutcome> {
        let mut tx = self.pool.begin().await.map_err(AppError::db)?;

        let registration = sqlx::query_as::<_, Registration>(
            "SELECT * FROM registrations WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::db)?
        .ok_or_else(|| AppError::not_found("Registration"))?;

        if !registration.status.is_decidable() {
            return Err(AppError::bad_request(format!(
                "Registration is already {}",
                registration.status
            )));
        }

        let registration = sqlx::query_as::<_, Registration>(
            "UPDATE registrations SET
                 status = 'denied',
                 denial_reason = $2,
                 approved_by = $3,
                 approved_at = NOW(),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(reason)
        .bind(admin_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::db)?;

        let event = sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
            .bind(registration.event_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::db)?;

        let (user_name, user_email) = sqlx::query_as::<_, (String, String)>(
            "SELECT name, email FROM users WHERE id = $1",
        )
        .bind(registration.user_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::db)?;

        tx.commit().await.map_err(AppError::db)?;

        Ok(DecisionOutcome {
            registration,
            event,
            user_name,
            user_email,
        })
    }

    /// Check a participant in (`approved -> attended`), addressed by
    /// (event, user) as scanned from the ticket.
    ///
    /// # Errors
    ///
    /// Database failures only; no approved registration is `Ok(None)`.
    pub async fn check_in(&self, event_id: Uuid, user_id: Uuid) -> ApiResult<Option<Registration>> {
        sqlx::query_as::<_, Registration>(
            "UPDATE registrations SET
                 status = 'attended',
                 checked_in_at = NOW(),
                 updated_at = NOW()
             WHERE event_id = $1 AND user_id = $2 AND status = 'approved'
             RETURNING *",
        )
        .bind(event_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::db)
    }

    /// A user's registrations with event summaries, newest first.
    ///
    /// # Errors
    ///
    /// Database failures only.
    pub async fn list_for_user(&self, user_id: Uuid) -> ApiResult<Vec<RegistrationWithEvent>> {
        sqlx::query_as::<_, RegistrationWithEvent>(
            "SELECT r.*,
                    e.title AS event_title,
                    e.date AS event_date,
                    e.location AS event_location,
                    e.category AS event_category
             FROM registrations r JOIN events e ON e.id = r.event_id
             WHERE r.user_id = $1
             ORDER BY r.created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::db)
    }

    /// The admin approval queue: every pending registration with both
    /// parties joined in, oldest first.
    ///
    /// # Errors
    ///
    /// Database failures only.
    pub async fn list_pending(&self) -> ApiResult<Vec<RegistrationWithParties>> {
        sqlx::query_as::<_, RegistrationWithParties>(
            "SELECT r.*,
                    u.name AS user_name,
                    u.email AS user_email,
                    e.title AS event_title,
                    e.date AS event_date,
                    e.location AS event_location
             FROM registrations r
             JOIN users u ON u.id = r.user_id
             JOIN events e ON e.id = r.event_id
             WHERE r.status = 'pending'
             ORDER BY r.created_at ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::db)
    }

    /// Every registration for one event, with registrant identity.
    ///
    /// # Errors
    ///
    /// Database failures only.
    pub async fn list_for_event(&self, event_id: Uuid) -> ApiResult<Vec<RegistrationWithParties>> {
        sqlx::query_as::<_, RegistrationWithParties>(
            "SELECT r.*,
                    u.name AS user_name,
                    u.email AS user_email,
                    e.title AS event_title,
                    e.date AS event_date,
                    e.location AS event_location
             FROM registrations r
             JOIN users u ON u.id = r.user_id
             JOIN events e ON e.id = r.event_id
             WHERE r.event_id = $1
             ORDER BY r.created_at ASC",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::db)
    }
}
