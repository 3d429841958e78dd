//! Request-gate extractors.
//!
//! Handlers declare their authentication and authorization requirements
//! through their parameter lists:
//!
//! ```rust,ignore
//! async fn my_registrations(user: AuthUser, ...) -> ApiResult<...>   // any account
//! async fn approve(admin: RequireAdmin, ...) -> ApiResult<...>       // admin only
//! async fn check_in(staff: RequireStaff, ...) -> ApiResult<...>      // organizer|admin
//! ```
//!
//! Verification is stateless: every request re-verifies the bearer token's
//! signature and expiry, nothing is cached. A rejection is terminal for the
//! request; clients re-authenticate through the refresh flow and retry.

use crate::auth::token::{TokenError, TokenIssuer};
use crate::domain::Role;
use crate::error::AppError;
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use uuid::Uuid;

/// Raw bearer token lifted from the `Authorization` header.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing authorization header"))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::unauthorized("Expected 'Bearer <token>'"))?;

        if token.is_empty() {
            return Err(AppError::unauthorized("Empty bearer token"));
        }

        Ok(Self(token.to_string()))
    }
}

/// Verified identity attached to the request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// User id from the token subject.
    pub id: Uuid,
    /// Role claim.
    pub role: Role,
    /// Display-name claim.
    pub name: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    TokenIssuer: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let bearer = BearerToken::from_request_parts(parts, state).await?;
        let issuer = TokenIssuer::from_ref(state);

        let claims = issuer
            .verify_access_token(&bearer.0)
            .map_err(|err| match err {
                TokenError::Expired => AppError::unauthorized("Token expired"),
                TokenError::Invalid => AppError::unauthorized("Invalid token"),
            })?;

        Ok(Self {
            id: claims.sub,
            role: claims.role,
            name: claims.name,
        })
    }
}

/// Gate: admin only.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub AuthUser);

#[async_trait]
impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
    TokenIssuer: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != Role::Admin {
            return Err(AppError::forbidden("Access denied"));
        }
        Ok(Self(user))
    }
}

/// Gate: organizer or admin.
#[derive(Debug, Clone)]
pub struct RequireStaff(pub AuthUser);

#[async_trait]
impl<S> FromRequestParts<S> for RequireStaff
where
    S: Send + Sync,
    TokenIssuer: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.role.is_staff() {
            return Err(AppError::forbidden("Access denied"));
        }
        Ok(Self(user))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new("middleware-test-secret", 1)
    }

    fn parts_with_header(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = value {
            builder = builder.header("authorization", value);
        }
        let (parts, ()) = builder.body(()).unwrap().into_parts();
        parts
    }

    #[tokio::test]
    async fn missing_header_is_unauthorized() {
        let mut parts = parts_with_header(None);
        let err = AuthUser::from_request_parts(&mut parts, &issuer())
            .await
            .unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn non_bearer_scheme_is_unauthorized() {
        let mut parts = parts_with_header(Some("Basic dXNlcjpwYXNz"));
        let err = BearerToken::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn valid_token_attaches_identity() {
        let issuer = issuer();
        let id = Uuid::new_v4();
        let token = issuer
            .issue_access_token(id, Role::Organizer, "Grace")
            .unwrap();

        let mut parts = parts_with_header(Some(&format!("Bearer {token}")));
        let user = AuthUser::from_request_parts(&mut parts, &issuer)
            .await
            .unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.role, Role::Organizer);
        assert_eq!(user.name, "Grace");
    }

    #[tokio::test]
    async fn tampered_token_is_unauthorized() {
        let issuer = issuer();
        let token = issuer
            .issue_access_token(Uuid::new_v4(), Role::Customer, "x")
            .unwrap();
        let tampered = format!("{token}x");

        let mut parts = parts_with_header(Some(&format!("Bearer {tampered}")));
        let err = AuthUser::from_request_parts(&mut parts, &issuer)
            .await
            .unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn admin_gate_rejects_other_roles() {
        let issuer = issuer();
        let token = issuer
            .issue_access_token(Uuid::new_v4(), Role::Organizer, "x")
            .unwrap();

        let mut parts = parts_with_header(Some(&format!("Bearer {token}")));
        let err = RequireAdmin::from_request_parts(&mut parts, &issuer)
            .await
            .unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn staff_gate_accepts_organizer_and_admin() {
        let issuer = issuer();
        for role in [Role::Organizer, Role::Admin] {
            let token = issuer.issue_access_token(Uuid::new_v4(), role, "x").unwrap();
            let mut parts = parts_with_header(Some(&format!("Bearer {token}")));
            assert!(
                RequireStaff::from_request_parts(&mut parts, &issuer)
                    .await
                    .is_ok()
            );
        }

        let token = issuer
            .issue_access_token(Uuid::new_v4(), Role::Customer, "x")
            .unwrap();
        let mut parts = parts_with_header(Some(&format!("Bearer {token}")));
        let err = RequireStaff::from_request_parts(&mut parts, &issuer)
            .await
            .unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::FORBIDDEN);
    }
}
