//! Dashboard and analytics endpoints, all read-only.

use crate::auth::{AuthUser, RequireAdmin};
use crate::domain::Event;
use crate::error::ApiResult;
use crate::state::AppState;
use crate::store::stats::{
    Analytics, CategoryCount, LeaderboardEntry, MonthCount, SummaryTotals, Trending,
};
use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

/// Summary response.
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    /// Headline counts.
    pub totals: SummaryTotals,
}

/// Dashboard widgets response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    /// Approved events per category.
    pub categories: Vec<CategoryCount>,
    /// Upcoming approved events per month.
    pub upcoming_by_month: Vec<MonthCount>,
}

/// Leaderboard response.
#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    /// Top users by points.
    pub leaderboard: Vec<LeaderboardEntry>,
}

/// Recommendations response.
#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    /// Upcoming events matched to the caller's interests.
    pub events: Vec<Event>,
}

/// Analytics query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct AnalyticsQuery {
    /// Trailing window in days (default 30).
    pub days: Option<i32>,
}

/// `GET /api/stats/summary` — public counts for the home page.
///
/// # Errors
///
/// Database failures only.
pub async fn summary(State(state): State<AppState>) -> ApiResult<Json<SummaryResponse>> {
    let totals = state.stats.summary().await?;
    Ok(Json(SummaryResponse { totals }))
}

/// `GET /api/stats/dashboard` — category and timeline widgets.
///
/// # Errors
///
/// Database failures only.
pub async fn dashboard(State(state): State<AppState>) -> ApiResult<Json<DashboardResponse>> {
    let categories = state.stats.categories().await?;
    let upcoming_by_month = state.stats.upcoming_by_month().await?;
    Ok(Json(DashboardResponse {
        categories,
        upcoming_by_month,
    }))
}

/// `GET /api/stats/trending` — popular, top-rated, and recent events.
///
/// # Errors
///
/// Database failures only.
pub async fn trending(State(state): State<AppState>) -> ApiResult<Json<Trending>> {
    Ok(Json(state.stats.trending().await?))
}

/// `GET /api/stats/leaderboard` — top participants by points.
///
/// # Errors
///
/// Database failures only.
pub async fn leaderboard(State(state): State<AppState>) -> ApiResult<Json<LeaderboardResponse>> {
    let leaderboard = state.stats.leaderboard().await?;
    Ok(Json(LeaderboardResponse { leaderboard }))
}

/// `GET /api/stats/recommendations` — personalized by the caller's past
/// registration categories.
///
/// # Errors
///
/// Database failures only.
pub async fn recommendations(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<RecommendationsResponse>> {
    let events = state.stats.recommendations(user.id).await?;
    Ok(Json(RecommendationsResponse { events }))
}

/// `GET /api/stats/analytics` — admin dashboard over a trailing window.
///
/// # Errors
///
/// Database failures only.
pub async fn analytics(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Query(query): Query<AnalyticsQuery>,
) -> ApiResult<Json<Analytics>> {
    let days = query.days.unwrap_or(30).clamp(1, 365);
    Ok(Json(state.stats.analytics(days).await?))
}
