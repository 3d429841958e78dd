//! Read-side aggregations for dashboards.
//!
//! Everything here is computed on demand from the live tables; there is no
//! caching layer and no write path.

use crate::domain::{Event, Role};
use crate::error::{ApiResult, AppError};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// Headline counts for the home page cards.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryTotals {
    /// All events.
    pub events: i64,
    /// Approved events.
    pub approved_events: i64,
    /// Approved events still in the future.
    pub upcoming_events: i64,
    /// All registrations.
    pub registrations: i64,
    /// Active (non-blocked) customers.
    pub customers: i64,
    /// Active (non-blocked) organizers.
    pub organizers: i64,
}

/// Count of approved events per category.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CategoryCount {
    /// Category name.
    pub category: String,
    /// Events in it.
    pub count: i64,
}

/// Count of upcoming approved events per calendar month.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MonthCount {
    /// Month as `YYYY-MM`.
    pub month: String,
    /// Events in it.
    pub count: i64,
}

/// An event annotated with its registration count.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct EventWithRegistrations {
    /// The event itself.
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub event: Event,
    /// Registrations counted for the ranking.
    pub registrations: i64,
}

/// Trending lists for the discovery page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Trending {
    /// Most registered events.
    pub popular: Vec<EventWithRegistrations>,
    /// Best rated approved events.
    pub top_rated: Vec<Event>,
    /// Most recently added approved events.
    pub recent: Vec<Event>,
}

/// One leaderboard row.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct LeaderboardEntry {
    /// Display name.
    pub name: String,
    /// Points balance.
    pub points: i32,
}

/// One engagement row in the admin analytics.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EngagementEntry {
    /// Display name.
    pub name: String,
    /// Email.
    pub email: String,
    /// Role.
    pub role: Role,
    /// Points balance.
    pub points: i32,
}

/// Admin analytics over a trailing window.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    /// All events.
    pub total_events: i64,
    /// All users.
    pub total_users: i64,
    /// All registrations.
    pub total_registrations: i64,
    /// All exhibitors.
    pub total_exhibitors: i64,
    /// Events ranked by registrations inside the window.
    pub popular_events: Vec<EventWithRegistrations>,
    /// Most active users.
    pub user_engagement: Vec<EngagementEntry>,
}

/// PostgreSQL-backed aggregation queries.
#[derive(Clone)]
pub struct StatsStore {
    pool: PgPool,
}

impl StatsStore {
    /// Create a repository on the shared pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn count(&self, sql: &str) -> ApiResult<i64> {
        sqlx::query_scalar::<_, i64>(sql)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::db)
    }

    /// Headline counts.
    ///
    /// # Errors
    ///
    /// Database failures only.
    pub async fn summary(&self) -> ApiResult<SummaryTotals> {
        Ok(SummaryTotals {
            events: self.count("SELECT COUNT(*) FROM events").await?,
            approved_events: self
                .count("SELECT COUNT(*) FROM events WHERE status = 'approved'")
                .await?,
            upcoming_events: self
                .count("SELECT COUNT(*) FROM events WHERE status = 'approved' AND date >= NOW()")
                .await?,
            registrations: self.count("SELECT COUNT(*) FROM registrations").await?,
            customers: self
                .count("SELECT COUNT(*) FROM users WHERE role = 'customer' AND NOT is_blocked")
                .await?,
            organizers: self
                .count("SELECT COUNT(*) FROM users WHERE role = 'organizer' AND NOT is_blocked")
                .await?,
        })
    }

    /// Approved events grouped by category, most populated first.
    ///
    /// # Errors
    ///
    /// Database failures only.
    pub async fn categories(&self) -> ApiResult<Vec<CategoryCount>> {
        sqlx::query_as::<_, CategoryCount>(
            "SELECT category, COUNT(*) AS count
             FROM events WHERE status = 'approved'
             GROUP BY category
             ORDER BY count DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::db)
    }

    /// Upcoming approved events bucketed by month, soonest first.
    ///
    /// # Errors
    ///
    /// Database failures only.
    pub async fn upcoming_by_month(&self) -> ApiResult<Vec<MonthCount>> {
        sqlx::query_as::<_, MonthCount>(
            "SELECT to_char(date, 'YYYY-MM') AS month, COUNT(*) AS count
             FROM events WHERE status = 'approved' AND date >= NOW()
             GROUP BY month
             ORDER BY month ASC
             LIMIT 6",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::db)
    }

    /// Popular, top-rated, and recent event lists, six each.
    ///
    /// # Errors
    ///
    /// Database failures only.
    pub async fn trending(&self) -> ApiResult<Trending> {
        let popular = sqlx::query_as::<_, EventWithRegistrations>(
            "SELECT e.*, COUNT(r.id) AS registrations
             FROM events e JOIN registrations r ON r.event_id = e.id
             GROUP BY e.id
             ORDER BY registrations DESC
             LIMIT 6",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::db)?;

        let top_rated = sqlx::query_as::<_, Event>(
            "SELECT * FROM events WHERE status = 'approved'
             ORDER BY average_rating DESC
             LIMIT 6",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::db)?;

        let recent = sqlx::query_as::<_, Event>(
            "SELECT * FROM events WHERE status = 'approved'
             ORDER BY created_at DESC
             LIMIT 6",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::db)?;

        Ok(Trending {
            popular,
            top_rated,
            recent,
        })
    }

    /// Top ten non-blocked customers and organizers by points.
    ///
    /// # Errors
    ///
    /// Database failures only.
    pub async fn leaderboard(&self) -> ApiResult<Vec<LeaderboardEntry>> {
        sqlx::query_as::<_, LeaderboardEntry>(
            "SELECT name, points FROM users
             WHERE role IN ('customer', 'organizer') AND NOT is_blocked
             ORDER BY points DESC
             LIMIT 10",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::db)
    }

    /// Upcoming approved events in the categories of the user's past
    /// registrations; falls back to all categories for a user with no
    /// registration history.
    ///
    /// # Errors
    ///
    /// Database failures only.
    pub async fn recommendations(&self, user_id: Uuid) -> ApiResult<Vec<Event>> {
        let categories: Vec<String> = sqlx::query_scalar(
            "SELECT DISTINCT e.category
             FROM registrations r JOIN events e ON e.id = r.event_id
             WHERE r.user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::db)?;

        let sql = if categories.is_empty() {
            "SELECT * FROM events
             WHERE status = 'approved' AND date >= NOW()
             ORDER BY date ASC LIMIT 6"
        } else {
            "SELECT * FROM events
             WHERE status = 'approved' AND date >= NOW() AND category = ANY($1)
             ORDER BY date ASC LIMIT 6"
        };

        let mut query = sqlx::query_as::<_, Event>(sql);
        if !categories.is_empty() {
            query = query.bind(categories);
        }
        query.fetch_all(&self.pool).await.map_err(AppError::db)
    }

    /// Admin analytics over the last `days` days.
    ///
    /// # Errors
    ///
    /// Database failures only.
    pub async fn analytics(&self, days: i32) -> ApiResult<Analytics> {
        let popular_events = sqlx::query_as::<_, EventWithRegistrations>(
            "SELECT e.*, COUNT(r.id) AS registrations
             FROM events e
             JOIN registrations r ON r.event_id = e.id
             WHERE r.created_at >= NOW() - make_interval(days => $1)
             GROUP BY e.id
             ORDER BY registrations DESC
             LIMIT 10",
        )
        .bind(days)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::db)?;

        let user_engagement = sqlx::query_as::<_, EngagementEntry>(
            "SELECT name, email, role, points FROM users
             WHERE role IN ('customer', 'organizer')
             ORDER BY points DESC
             LIMIT 10",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::db)?;

        Ok(Analytics {
            total_events: self.count("SELECT COUNT(*) FROM events").await?,
            total_users: self.count("SELECT COUNT(*) FROM users").await?,
            total_registrations: self.count("SELECT COUNT(*) FROM registrations").await?,
            total_exhibitors: self.count("SELECT COUNT(*) FROM exhibitors").await?,
            popular_events,
            user_engagement,
        })
    }
}
