//! HTTP surface: request/response types, handlers, and the router.

pub mod admin;
pub mod auth;
pub mod events;
pub mod exhibitors;
pub mod feedback;
pub mod health;
pub mod notifications;
pub mod registrations;
pub mod reviews;
pub mod routes;
pub mod stats;
pub mod talks;
pub mod websocket;

pub use routes::build_router;
