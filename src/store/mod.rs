//! PostgreSQL repositories, one per aggregate.
//!
//! Each store wraps the shared [`sqlx::PgPool`] and exposes the queries its
//! aggregate needs. Uniqueness rules live in the schema; stores translate
//! constraint violations into user-facing conflicts through
//! [`crate::error::AppError::db_or_conflict`].

pub mod events;
pub mod exhibitors;
pub mod feedback;
pub mod notifications;
pub mod registrations;
pub mod reviews;
pub mod stats;
pub mod talks;
pub mod users;

pub use events::{EventFilter, EventStore};
pub use exhibitors::ExhibitorStore;
pub use feedback::FeedbackStore;
pub use notifications::NotificationStore;
pub use registrations::{DecisionOutcome, RegistrationStore};
pub use reviews::ReviewStore;
pub use stats::StatsStore;
pub use talks::TalkStore;
pub use users::UserStore;

use crate::error::AppError;
use sqlx::PgPool;

/// Run the embedded migrations against the given pool.
///
/// # Errors
///
/// Returns a 500-mapped error when a migration fails to apply.
pub async fn migrate(pool: &PgPool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| AppError::internal(anyhow::Error::new(e).context("migration failed")))
}
