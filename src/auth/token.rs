//! Access and refresh token primitives.
//!
//! Access tokens are signed HS256 JWTs carrying the subject id, role, and
//! display name; verification is stateless and happens on every request.
//! Refresh tokens are high-entropy opaque strings with no embedded claims;
//! they are persisted on the user row and exchanged — never used to
//! authorize ordinary calls.

use crate::domain::Role;
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Verification failure modes.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    /// Signature valid but the token is past its expiry.
    #[error("Token expired")]
    Expired,
    /// Malformed token or bad signature.
    #[error("Invalid token")]
    Invalid,
}

/// Claims embedded in an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id.
    pub sub: Uuid,
    /// Role at issuance time.
    pub role: Role,
    /// Display name at issuance time.
    pub name: String,
    /// Issued-at, seconds since epoch.
    pub iat: i64,
    /// Expiry, seconds since epoch.
    pub exp: i64,
}

/// Issues and verifies access tokens with a process-wide secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    /// Create an issuer from the shared secret and a token lifetime in hours.
    #[must_use]
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(ttl_hours),
        }
    }

    /// Issue a signed access token for the given identity.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Invalid`] if signing fails, which only happens
    /// on key misconfiguration.
    pub fn issue_access_token(
        &self,
        user_id: Uuid,
        role: Role,
        name: &str,
    ) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            role,
            name: name.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding).map_err(|_| TokenError::Invalid)
    }

    /// Verify a token and return its claims.
    ///
    /// # Errors
    ///
    /// [`TokenError::Expired`] past the expiry window, [`TokenError::Invalid`]
    /// for anything else (bad signature, malformed payload).
    pub fn verify_access_token(&self, token: &str) -> Result<Claims, TokenError> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|err| match err.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })
    }

    #[cfg(test)]
    fn with_ttl(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }
}

/// Number of random bytes in a refresh token before encoding.
const REFRESH_TOKEN_BYTES: usize = 40;

/// Generate an opaque refresh token.
///
/// No claims, no structure: just entropy, URL-safe base64 encoded. The
/// caller persists it on the user row; possession is the whole credential.
#[must_use]
pub fn generate_refresh_token() -> String {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new("test-secret", 1)
    }

    #[test]
    fn round_trip_preserves_claims() {
        let issuer = issuer();
        let user_id = Uuid::new_v4();
        let token = issuer
            .issue_access_token(user_id, Role::Organizer, "Ada Lovelace")
            .unwrap();

        let claims = issuer.verify_access_token(&token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.role, Role::Organizer);
        assert_eq!(claims.name, "Ada Lovelace");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn expired_token_is_rejected() {
        // Issue a token that expired two minutes ago, beyond any leeway.
        let issuer = TokenIssuer::with_ttl("test-secret", Duration::minutes(-2));
        let token = issuer
            .issue_access_token(Uuid::new_v4(), Role::Customer, "x")
            .unwrap();

        assert_eq!(
            issuer.verify_access_token(&token),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = issuer()
            .issue_access_token(Uuid::new_v4(), Role::Admin, "x")
            .unwrap();

        let other = TokenIssuer::new("different-secret", 1);
        assert_eq!(
            other.verify_access_token(&token),
            Err(TokenError::Invalid)
        );
    }

    #[test]
    fn garbage_is_rejected() {
        assert_eq!(
            issuer().verify_access_token("not.a.token"),
            Err(TokenError::Invalid)
        );
        assert_eq!(issuer().verify_access_token(""), Err(TokenError::Invalid));
    }

    #[test]
    fn refresh_tokens_are_opaque_and_distinct() {
        let a = generate_refresh_token();
        let b = generate_refresh_token();
        assert_ne!(a, b);
        // 40 bytes of entropy -> 54 base64 characters, no padding.
        assert_eq!(a.len(), 54);
        assert!(!a.contains('='));
    }
}
