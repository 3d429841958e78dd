//! Router assembly.

use super::{
    admin, auth, events, exhibitors, feedback, health, notifications, registrations, reviews,
    stats, talks, websocket,
};
use crate::state::AppState;
use axum::{
    Router,
    http::HeaderValue,
    routing::{delete, get, post, put},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// CORS layer for the configured SPA origin; an unparseable origin falls
/// back to permissive (development).
fn cors_layer(cors_origin: &str) -> CorsLayer {
    cors_origin.parse::<HeaderValue>().map_or_else(
        |_| CorsLayer::permissive(),
        |origin| {
            CorsLayer::new()
                .allow_origin(origin)
                .allow_methods(Any)
                .allow_headers(Any)
        },
    )
}

/// Build the complete router over the shared state.
///
/// Route-level auth is declared by each handler's extractors; the router
/// only decides what exists where.
#[must_use]
pub fn build_router(state: AppState, cors_origin: &str) -> Router {
    let auth_routes = Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/refresh", post(auth::refresh))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
        .route("/profile", put(auth::update_profile))
        .route("/change-password", put(auth::change_password));

    let event_routes = Router::new()
        .route("/", get(events::list_events).post(events::create_event))
        .route(
            "/:id",
            get(events::get_event)
                .put(events::update_event)
                .delete(events::delete_event),
        );

    let registration_routes = Router::new()
        .route("/me", get(registrations::my_registrations))
        .route("/pending", get(registrations::pending_registrations))
        .route("/:id/register", post(registrations::register))
        .route("/:id/approve", post(registrations::approve_registration))
        .route("/:id/deny", post(registrations::deny_registration))
        .route("/:id/checkin", post(registrations::check_in))
        .route("/:id/participants", get(registrations::participants))
        .route(
            "/:id/participants.csv",
            get(registrations::participants_csv),
        );

    let review_routes = Router::new()
        .route("/user/me", get(reviews::my_reviews))
        .route(
            "/:id",
            get(reviews::list_reviews)
                .post(reviews::add_review)
                .put(reviews::update_review)
                .delete(reviews::delete_review),
        );

    let talk_routes = Router::new()
        .route("/", get(talks::list_talks).post(talks::create_talk))
        .route("/bookmarks", get(talks::my_bookmarks))
        .route("/:id", put(talks::update_talk).delete(talks::delete_talk))
        .route(
            "/:id/bookmark",
            post(talks::bookmark_talk).delete(talks::unbookmark_talk),
        );

    let exhibitor_routes = Router::new()
        .route(
            "/",
            get(exhibitors::list_approved).post(exhibitors::create_exhibitor),
        )
        .route("/approved", get(exhibitors::list_approved))
        .route("/all", get(exhibitors::list_all))
        .route(
            "/:id",
            get(exhibitors::get_exhibitor)
                .put(exhibitors::update_exhibitor)
                .delete(exhibitors::delete_exhibitor),
        )
        .route("/:id/status", post(exhibitors::set_status));

    let notification_routes = Router::new()
        .route("/", get(notifications::list_notifications))
        .route("/read-all", post(notifications::mark_all_read))
        .route("/read/all", delete(notifications::delete_all_read))
        .route("/:id", delete(notifications::delete_notification))
        .route("/:id/read", post(notifications::mark_read))
        .route("/:id/unread", post(notifications::mark_unread));

    let admin_routes = Router::new()
        .route("/events/pending", get(admin::pending_events))
        .route("/events/:id/approve", post(admin::approve_event))
        .route("/events/:id/reject", post(admin::reject_event))
        .route("/users/:id/block", post(admin::block_user))
        .route("/users/:id/unblock", post(admin::unblock_user));

    let stats_routes = Router::new()
        .route("/summary", get(stats::summary))
        .route("/dashboard", get(stats::dashboard))
        .route("/trending", get(stats::trending))
        .route("/leaderboard", get(stats::leaderboard))
        .route("/recommendations", get(stats::recommendations))
        .route("/analytics", get(stats::analytics));

    let feedback_routes = Router::new().route(
        "/",
        get(feedback::list_feedback).post(feedback::submit_feedback),
    );

    let api = Router::new()
        .nest("/auth", auth_routes)
        .nest("/events", event_routes)
        .nest("/registrations", registration_routes)
        .nest("/reviews", review_routes)
        .nest("/sessions", talk_routes)
        .nest("/exhibitors", exhibitor_routes)
        .nest("/notifications", notification_routes)
        .nest("/admin", admin_routes)
        .nest("/stats", stats_routes)
        .nest("/feedback", feedback_routes);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/ws", get(websocket::upgrade))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origin))
        .with_state(state)
}
