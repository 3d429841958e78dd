//! Event repository: CRUD, filtered listing, moderation.

use crate::domain::{Event, EventStatus, EventWithOrganizer, Page};
use crate::error::{ApiResult, AppError};
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

/// Fields for a new event.
#[derive(Debug, Clone)]
pub struct NewEvent {
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Category tag.
    pub category: String,
    /// When it takes place.
    pub date: DateTime<Utc>,
    /// Venue.
    pub location: String,
    /// Approved-registration ceiling; `0` = unlimited.
    pub capacity: i32,
    /// Optional poster URL.
    pub poster_url: Option<String>,
}

/// Owner-editable fields; `None` leaves the column untouched.
#[derive(Debug, Default, Clone)]
pub struct EventPatch {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New category.
    pub category: Option<String>,
    /// New date.
    pub date: Option<DateTime<Utc>>,
    /// New location.
    pub location: Option<String>,
    /// New capacity.
    pub capacity: Option<i32>,
    /// New poster URL.
    pub poster_url: Option<String>,
}

/// Listing filter. Every field is optional; an empty filter matches all rows.
#[derive(Debug, Default, Clone)]
pub struct EventFilter {
    /// Case-insensitive substring over title and description.
    pub q: Option<String>,
    /// Exact category.
    pub category: Option<String>,
    /// Exact status.
    pub status: Option<EventStatus>,
    /// Exact organizer.
    pub organizer: Option<Uuid>,
    /// Inclusive lower date bound.
    pub date_from: Option<DateTime<Utc>>,
    /// Inclusive upper date bound.
    pub date_to: Option<DateTime<Utc>>,
    /// Requested sort column (whitelisted; defaults to `date`).
    pub sort_by: Option<String>,
    /// `true` for descending order.
    pub descending: bool,
}

/// Map a client-supplied sort key onto a real column.
///
/// Unknown keys fall back to `date`; the whitelist keeps user input out of
/// the SQL text.
#[must_use]
pub fn sort_column(requested: Option<&str>) -> &'static str {
    match requested {
        Some("title") => "title",
        Some("category") => "category",
        Some("capacity") => "capacity",
        Some("status") => "status",
        Some("averageRating" | "average_rating") => "average_rating",
        Some("createdAt" | "created_at") => "created_at",
        _ => "date",
    }
}

fn push_filter_clauses(qb: &mut QueryBuilder<'_, Postgres>, filter: &EventFilter) {
    if let Some(q) = &filter.q {
        let pattern = format!("%{q}%");
        qb.push(" AND (e.title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR e.description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(category) = &filter.category {
        qb.push(" AND e.category = ").push_bind(category.clone());
    }
    if let Some(status) = filter.status {
        qb.push(" AND e.status = ").push_bind(status);
    }
    if let Some(organizer) = filter.organizer {
        qb.push(" AND e.organizer_id = ").push_bind(organizer);
    }
    if let Some(from) = filter.date_from {
        qb.push(" AND e.date >= ").push_bind(from);
    }
    if let Some(to) = filter.date_to {
        qb.push(" AND e.date <= ").push_bind(to);
    }
}

/// PostgreSQL-backed event repository.
#[derive(Clone)]
pub struct EventStore {
    pool: PgPool,
}

impl EventStore {
    /// Create a repository on the shared pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new event owned by `organizer_id`, always `pending`.
    ///
    /// # Errors
    ///
    /// Database failures only.
    pub async fn create(&self, organizer_id: Uuid, fields: NewEvent) -> ApiResult<Event> {
        sqlx::query_as::<_, Event>(
            "INSERT INTO events
                 (id, title, description, category, date, location, capacity, organizer_id, poster_url)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(fields.title)
        .bind(fields.description)
        .bind(fields.category)
        .bind(fields.date)
        .bind(fields.location)
        .bind(fields.capacity)
        .bind(organizer_id)
        .bind(fields.poster_url)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::db)
    }

    /// Look up by primary key.
    ///
    /// # Errors
    ///
    /// Database failures only.
    pub async fn find_by_id(&self, id: Uuid) -> ApiResult<Option<Event>> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::db)
    }

    /// Look up by primary key, joined with the organizer name.
    ///
    /// # Errors
    ///
    /// Database failures only.
    pub async fn find_with_organizer(&self, id: Uuid) -> ApiResult<Option<EventWithOrganizer>> {
        sqlx::query_as::<_, EventWithOrganizer>(
            "SELECT e.*, u.name AS organizer_name
             FROM events e JOIN users u ON u.id = e.organizer_id
             WHERE e.id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::db)
    }

    /// Filtered, sorted, paginated listing plus the total match count.
    ///
    /// # Errors
    ///
    /// Database failures only.
    pub async fn list(
        &self,
        filter: &EventFilter,
        page: Page,
    ) -> ApiResult<(Vec<EventWithOrganizer>, i64)> {
        let mut qb = QueryBuilder::new(
            "SELECT e.*, u.name AS organizer_name
             FROM events e JOIN users u ON u.id = e.organizer_id
             WHERE TRUE",
        );
        push_filter_clauses(&mut qb, filter);
        qb.push(" ORDER BY e.")
            .push(sort_column(filter.sort_by.as_deref()))
            .push(if filter.descending { " DESC" } else { " ASC" })
            .push(" LIMIT ")
            .push_bind(page.size)
            .push(" OFFSET ")
            .push_bind(page.offset());

        let rows = qb
            .build_query_as::<EventWithOrganizer>()
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::db)?;

        let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM events e WHERE TRUE");
        push_filter_clauses(&mut count_qb, filter);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::db)?;

        Ok((rows, total))
    }

    /// Update an event, but only when `organizer_id` owns it.
    ///
    /// A non-owned id behaves exactly like a missing one (`Ok(None)`), so
    /// callers cannot learn whether somebody else's event exists.
    ///
    /// # Errors
    ///
    /// Database failures only.
    pub async fn update_owned(
        &self,
        id: Uuid,
        organizer_id: Uuid,
        patch: EventPatch,
    ) -> ApiResult<Option<Event>> {
        sqlx::query_as::<_, Event>(
            "UPDATE events SET
                 title = COALESCE($3, title),
                 description = COALESCE($4, description),
                 category = COALESCE($5, category),
                 date = COALESCE($6, date),
                 location = COALESCE($7, location),
                 capacity = COALESCE($8, capacity),
                 poster_url = COALESCE($9, poster_url),
                 updated_at = NOW()
             WHERE id = $1 AND organizer_id = $2
             RETURNING *",
        )
        .bind(id)
        .bind(organizer_id)
        .bind(patch.title)
        .bind(patch.description)
        .bind(patch.category)
        .bind(patch.date)
        .bind(patch.location)
        .bind(patch.capacity)
        .bind(patch.poster_url)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::db)
    }

    /// Delete an event under the same ownership predicate.
    ///
    /// # Errors
    ///
    /// Database failures only.
    pub async fn delete_owned(&self, id: Uuid, organizer_id: Uuid) -> ApiResult<bool> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1 AND organizer_id = $2")
            .bind(id)
            .bind(organizer_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::db)?;
        Ok(result.rows_affected() > 0)
    }

    /// Admin moderation: move a pending event to approved or rejected.
    ///
    /// Status is one-way here — once decided, an event cannot be moved again
    /// through this path.
    ///
    /// # Errors
    ///
    /// 404 for an unknown id, 400 when the event was already decided.
    pub async fn moderate(&self, id: Uuid, new_status: EventStatus) -> ApiResult<Event> {
        let updated = sqlx::query_as::<_, Event>(
            "UPDATE events SET status = $2, updated_at = NOW()
             WHERE id = $1 AND status = 'pending'
             RETURNING *",
        )
        .bind(id)
        .bind(new_status)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::db)?;

        if let Some(event) = updated {
            return Ok(event);
        }

        match self.find_by_id(id).await? {
            Some(event) => Err(AppError::bad_request(format!(
                "Event is already {}",
                event.status
            ))),
            None => Err(AppError::not_found("Event")),
        }
    }

    /// All pending events, oldest first, for the moderation queue.
    ///
    /// # Errors
    ///
    /// Database failures only.
    pub async fn list_pending(&self) -> ApiResult<Vec<EventWithOrganizer>> {
        sqlx::query_as::<_, EventWithOrganizer>(
            "SELECT e.*, u.name AS organizer_name
             FROM events e JOIN users u ON u.id = e.organizer_id
             WHERE e.status = 'pending'
             ORDER BY e.created_at ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::db)
    }

    /// Recompute the denormalized `average_rating` from current reviews.
    ///
    /// Mean of all ratings rounded to one decimal place, `0` when the event
    /// has no reviews.
    ///
    /// # Errors
    ///
    /// Database failures only.
    pub async fn refresh_average_rating(&self, event_id: Uuid) -> ApiResult<()> {
        sqlx::query(
            "UPDATE events SET
                 average_rating = COALESCE(
                     (SELECT ROUND(AVG(rating)::numeric, 1)::double precision
                      FROM reviews WHERE event_id = $1),
                     0),
                 updated_at = NOW()
             WHERE id = $1",
        )
        .bind(event_id)
        .execute(&self.pool)
        .await
        .map_err(AppError::db)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn sort_whitelist_maps_known_keys() {
        assert_eq!(sort_column(Some("title")), "title");
        assert_eq!(sort_column(Some("averageRating")), "average_rating");
        assert_eq!(sort_column(Some("created_at")), "created_at");
    }

    #[test]
    fn sort_whitelist_defaults_unknown_keys_to_date() {
        assert_eq!(sort_column(None), "date");
        assert_eq!(sort_column(Some("date")), "date");
        // Injection attempts collapse to the default column.
        assert_eq!(sort_column(Some("date; DROP TABLE events")), "date");
        assert_eq!(sort_column(Some("organizer_id")), "date");
    }
}
