//! Error type bridging domain failures to HTTP responses.
//!
//! Every failure leaving a handler is an [`AppError`]; its `IntoResponse`
//! impl renders the wire contract: a JSON body `{"message": ...}` with a
//! status from the documented taxonomy (400 validation/business rule,
//! 401 authentication, 403 authorization, 404 not-found-or-not-owned,
//! 500 unexpected).

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;

/// Result type alias for API handlers and stores.
pub type ApiResult<T> = Result<T, AppError>;

/// Application error carried through handlers and stores.
///
/// The message is user-facing; the optional source is kept for server-side
/// logging only and never serialized.
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    source: Option<anyhow::Error>,
}

impl AppError {
    /// Create an error with an explicit status.
    #[must_use]
    pub const fn new(status: StatusCode, message: String) -> Self {
        Self {
            status,
            message,
            source: None,
        }
    }

    /// Attach an internal source error for logging.
    #[must_use]
    pub fn with_source(mut self, source: anyhow::Error) -> Self {
        self.source = Some(source);
        self
    }

    /// 400 Bad Request: validation failures and violated business rules.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message.into())
    }

    /// 400 Bad Request for uniqueness conflicts (duplicate registration,
    /// duplicate review, duplicate email, capacity reached).
    ///
    /// Conflicts deliberately share the validation status rather than 409;
    /// clients distinguish them by message.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message.into())
    }

    /// 401 Unauthorized: missing, malformed, or expired credentials.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message.into())
    }

    /// 403 Forbidden: wrong role or blocked account.
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message.into())
    }

    /// 404 Not Found.
    ///
    /// Also used for "exists but not owned by the caller" so that ownership
    /// probes cannot confirm the existence of other people's resources.
    #[must_use]
    pub fn not_found(resource: impl fmt::Display) -> Self {
        Self::new(StatusCode::NOT_FOUND, format!("{resource} not found"))
    }

    /// 500 Internal Server Error with a generic client message.
    #[must_use]
    pub fn internal(source: anyhow::Error) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "An internal error occurred".to_string(),
        )
        .with_source(source)
    }

    /// Translate a database error from a plain read/write.
    ///
    /// Everything surfaces as a 500; constraint-sensitive writes go through
    /// [`AppError::db_or_conflict`] instead.
    #[must_use]
    pub fn db(err: sqlx::Error) -> Self {
        Self::internal(anyhow::Error::new(err).context("database error"))
    }

    /// Translate a database error from a write guarded by a uniqueness
    /// constraint.
    ///
    /// This is the single place where duplicate-key violations become
    /// user-facing conflicts: both the defensive pre-checks and the
    /// authoritative constraints funnel through the same message.
    #[must_use]
    pub fn db_or_conflict(err: sqlx::Error, conflict_message: &str) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return Self::conflict(conflict_message);
            }
        }
        Self::db(err)
    }

    /// The HTTP status this error renders with.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// The user-facing message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.status, self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            if let Some(source) = &self.source {
                tracing::error!(status = %self.status, error = ?source, "request failed");
            } else {
                tracing::error!(status = %self.status, message = %self.message, "request failed");
            }
        }

        let body = ErrorBody {
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal(err)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_taxonomy() {
        assert_eq!(AppError::bad_request("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::conflict("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::unauthorized("x").status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AppError::forbidden("x").status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::not_found("Event").status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn not_found_names_the_resource() {
        let err = AppError::not_found("Registration");
        assert_eq!(err.message(), "Registration not found");
    }

    #[test]
    fn internal_hides_the_source_message() {
        let err = AppError::internal(anyhow::anyhow!("connection refused"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "An internal error occurred");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn non_unique_db_error_is_internal() {
        let err = AppError::db_or_conflict(sqlx::Error::RowNotFound, "already registered");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn display_includes_status_and_message() {
        let err = AppError::forbidden("Access denied");
        assert_eq!(err.to_string(), "[403 Forbidden] Access denied");
    }
}
