//! Exhibitor repository.

use crate::domain::{Exhibitor, ExhibitorStatus};
use crate::error::{ApiResult, AppError};
use sqlx::PgPool;
use uuid::Uuid;

/// Fields for a new exhibitor profile.
#[derive(Debug, Clone)]
pub struct NewExhibitor {
    /// Company name.
    pub company_name: String,
    /// Company description.
    pub description: String,
    /// Products shown.
    pub products: String,
    /// Category tag.
    pub category: String,
    /// Contact email.
    pub contact_email: String,
    /// Contact phone.
    pub contact_phone: Option<String>,
    /// Website URL.
    pub website: Option<String>,
    /// Logo URL.
    pub logo_url: Option<String>,
    /// Booth number.
    pub booth_number: Option<String>,
    /// Booth row.
    pub booth_row: Option<String>,
    /// Booth size class.
    pub booth_size: Option<String>,
}

/// Updatable exhibitor fields; `None` leaves the column untouched.
#[derive(Debug, Default, Clone)]
pub struct ExhibitorPatch {
    /// New company name.
    pub company_name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New products.
    pub products: Option<String>,
    /// New category.
    pub category: Option<String>,
    /// New contact email.
    pub contact_email: Option<String>,
    /// New contact phone.
    pub contact_phone: Option<String>,
    /// New website.
    pub website: Option<String>,
    /// New logo URL.
    pub logo_url: Option<String>,
    /// New booth number.
    pub booth_number: Option<String>,
    /// New booth row.
    pub booth_row: Option<String>,
    /// New booth size.
    pub booth_size: Option<String>,
}

/// PostgreSQL-backed exhibitor repository.
#[derive(Clone)]
pub struct ExhibitorStore {
    pool: PgPool,
}

impl ExhibitorStore {
    /// Create a repository on the shared pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Publicly visible (approved) exhibitors.
    ///
    /// # Errors
    ///
    /// Database failures only.
    pub async fn list_approved(&self) -> ApiResult<Vec<Exhibitor>> {
        sqlx::query_as::<_, Exhibitor>(
            "SELECT * FROM exhibitors WHERE status = 'approved' ORDER BY company_name ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::db)
    }

    /// Every exhibitor, for staff.
    ///
    /// # Errors
    ///
    /// Database failures only.
    pub async fn list_all(&self) -> ApiResult<Vec<Exhibitor>> {
        sqlx::query_as::<_, Exhibitor>("SELECT * FROM exhibitors ORDER BY company_name ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::db)
    }

    /// Look up by primary key.
    ///
    /// # Errors
    ///
    /// Database failures only.
    pub async fn find_by_id(&self, id: Uuid) -> ApiResult<Option<Exhibitor>> {
        sqlx::query_as::<_, Exhibitor>("SELECT * FROM exhibitors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::db)
    }

    /// Insert a new profile owned by `organizer_id`, always `pending`.
    ///
    /// # Errors
    ///
    /// Database failures only.
    pub async fn create(&self, organizer_id: Uuid, fields: NewExhibitor) -> ApiResult<Exhibitor> {
        sqlx::query_as::<_, Exhibitor>(
            "INSERT INTO exhibitors
                 (id, company_name, description, products, category, contact_email,
                  contact_phone, website, logo_url, booth_number, booth_row, booth_size,
                  organizer_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(fields.company_name)
        .bind(fields.description)
        .bind(fields.products)
        .bind(fields.category)
        .bind(fields.contact_email)
        .bind(fields.contact_phone)
        .bind(fields.website)
        .bind(fields.logo_url)
        .bind(fields.booth_number)
        .bind(fields.booth_row)
        .bind(fields.booth_size)
        .bind(organizer_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::db)
    }

    /// Apply a patch.
    ///
    /// # Errors
    ///
    /// Database failures only; a missing row is `Ok(None)`.
    pub async fn update(&self, id: Uuid, patch: ExhibitorPatch) -> ApiResult<Option<Exhibitor>> {
        sqlx::query_as::<_, Exhibitor>(
            "UPDATE exhibitors SET
                 company_name = COALESCE($2, company_name),
                 description = COALESCE($3, description),
                 products = COALESCE($4, products),
                 category = COALESCE($5, category),
                 contact_email = COALESCE($6, contact_email),
                 contact_phone = COALESCE($7, contact_phone),
                 website = COALESCE($8, website),
                 logo_url = COALESCE($9, logo_url),
                 booth_number = COALESCE($10, booth_number),
                 booth_row = COALESCE($11, booth_row),
                 booth_size = COALESCE($12, booth_size),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(patch.company_name)
        .bind(patch.description)
        .bind(patch.products)
        .bind(patch.category)
        .bind(patch.contact_email)
        .bind(patch.contact_phone)
        .bind(patch.website)
        .bind(patch.logo_url)
        .bind(patch.booth_number)
        .bind(patch.booth_row)
        .bind(patch.booth_size)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::db)
    }

    /// Set the moderation status.
    ///
    /// # Errors
    ///
    /// Database failures only; a missing row is `Ok(None)`.
    pub async fn set_status(
        &self,
        id: Uuid,
        status: ExhibitorStatus,
    ) -> ApiResult<Option<Exhibitor>> {
        sqlx::query_as::<_, Exhibitor>(
            "UPDATE exhibitors SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::db)
    }

    /// Delete a profile.
    ///
    /// # Errors
    ///
    /// Database failures only.
    pub async fn delete(&self, id: Uuid) -> ApiResult<bool> {
        let result = sqlx::query("DELETE FROM exhibitors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::db)?;
        Ok(result.rows_affected() > 0)
    }
}
