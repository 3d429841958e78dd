//! Liveness and readiness probes.

use crate::error::{ApiResult, AppError};
use crate::state::AppState;
use axum::{Json, extract::State};
use serde::Serialize;

/// Probe response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok` when the probe passes.
    pub status: &'static str,
}

/// `GET /health` — process is up.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// `GET /ready` — database reachable.
///
/// # Errors
///
/// 500 when the database does not answer.
pub async fn ready(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&state.db)
        .await
        .map_err(|e| AppError::internal(anyhow::Error::new(e).context("database not ready")))?;
    Ok(Json(HealthResponse { status: "ok" }))
}
