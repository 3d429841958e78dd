//! Authentication and authorization.
//!
//! - [`token`]: signed access tokens and opaque refresh tokens
//! - [`password`]: bcrypt hashing and the password policy
//! - [`middleware`]: extractors gating handlers on identity and role

pub mod middleware;
pub mod password;
pub mod token;

pub use middleware::{AuthUser, BearerToken, RequireAdmin, RequireStaff};
pub use token::{Claims, TokenIssuer, generate_refresh_token};

/// Validate an email address format.
///
/// Basic shape check: exactly one `@`, non-empty local and dotted domain
/// parts, sane length. Full RFC 5322 compliance is out of scope.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    if email.len() < 3 || email.len() > 255 {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    if !domain.contains('.') {
        return false;
    }

    let valid_local = |c: char| c.is_alphanumeric() || matches!(c, '.' | '-' | '+' | '_');
    let valid_domain = |c: char| c.is_alphanumeric() || matches!(c, '.' | '-');

    local.chars().all(valid_local)
        && domain.chars().all(valid_domain)
        && domain.split('.').all(|part| !part.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_addresses() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("user.name+tag@subdomain.example.co.uk"));
        assert!(is_valid_email("a@b.c"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_valid_email("invalid"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("user@@example.com"));
        assert!(!is_valid_email("user@nodot"));
        assert!(!is_valid_email("user@example..com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn rejects_overlong_addresses() {
        let long = format!("{}@example.com", "a".repeat(250));
        assert!(!is_valid_email(&long));
    }
}
