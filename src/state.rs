//! Application state shared across all HTTP handlers.

use crate::auth::TokenIssuer;
use crate::notify::Notifier;
use crate::providers::{Mailer, QrGenerator};
use crate::store::{
    EventStore, ExhibitorStore, FeedbackStore, NotificationStore, RegistrationStore, ReviewStore,
    StatsStore, TalkStore, UserStore,
};
use axum::extract::FromRef;
use sqlx::PgPool;
use std::sync::Arc;

/// Everything a handler can reach: one repository per aggregate, the token
/// issuer, the notifier, and the external collaborators behind their trait
/// seams. Cloned per request; every field is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// The shared connection pool (readiness probe, tests).
    pub db: PgPool,
    /// User accounts.
    pub users: UserStore,
    /// Events.
    pub events: EventStore,
    /// Registrations.
    pub registrations: RegistrationStore,
    /// Reviews.
    pub reviews: ReviewStore,
    /// Conference talks.
    pub talks: TalkStore,
    /// Exhibitors.
    pub exhibitors: ExhibitorStore,
    /// Notifications.
    pub notifications: NotificationStore,
    /// Feedback submissions.
    pub feedback: FeedbackStore,
    /// Dashboard aggregations.
    pub stats: StatsStore,
    /// Access-token issuing and verification.
    pub tokens: TokenIssuer,
    /// Notification persistence + live fan-out.
    pub notifier: Notifier,
    /// Email delivery.
    pub mailer: Arc<dyn Mailer>,
    /// QR ticket rendering.
    pub qr: Arc<dyn QrGenerator>,
}

impl AppState {
    /// Assemble the state from its externally constructed pieces.
    #[must_use]
    pub fn new(
        pool: PgPool,
        tokens: TokenIssuer,
        mailer: Arc<dyn Mailer>,
        qr: Arc<dyn QrGenerator>,
    ) -> Self {
        let notifications = NotificationStore::new(pool.clone());
        Self {
            users: UserStore::new(pool.clone()),
            events: EventStore::new(pool.clone()),
            registrations: RegistrationStore::new(pool.clone()),
            reviews: ReviewStore::new(pool.clone()),
            talks: TalkStore::new(pool.clone()),
            exhibitors: ExhibitorStore::new(pool.clone()),
            notifier: Notifier::new(notifications.clone()),
            notifications,
            feedback: FeedbackStore::new(pool.clone()),
            stats: StatsStore::new(pool.clone()),
            db: pool,
            tokens,
            mailer,
            qr,
        }
    }
}

// Lets the auth extractors pull the issuer straight out of the state.
impl FromRef<AppState> for TokenIssuer {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}
