//! Campus and conference event management API.
//!
//! A three-tier CRUD service behind a JSON HTTP API: users sign up and
//! register for events, organizers run events and exhibitor booths, admins
//! moderate both queues, and a WebSocket channel streams notifications and
//! announcements to connected clients.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │  api/        Axum handlers + router      │  ← auth extractors gate here
//! ├──────────────────────────────────────────┤
//! │  store/      one repository per aggregate│  ← sqlx/PostgreSQL
//! │  domain.rs   entities + transition rules │
//! ├──────────────────────────────────────────┤
//! │  providers/  mailer + QR (trait seams)   │  ← best-effort side effects
//! │  notify/     persisted + live fan-out    │
//! └──────────────────────────────────────────┘
//! ```
//!
//! The one concurrency-sensitive path is registration approval: capacity
//! is enforced inside a transaction holding the event row lock, so
//! concurrent admins cannot oversell a capped event.

pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod notify;
pub mod providers;
pub mod state;
pub mod store;

pub use config::Config;
pub use error::{ApiResult, AppError};
pub use state::AppState;
