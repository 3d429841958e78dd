//! Password hashing and the password policy.
//!
//! bcrypt runs on the blocking pool so a burst of logins cannot stall the
//! async executor.

use crate::error::{ApiResult, AppError};

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Enforce the password policy on a candidate password.
///
/// # Errors
///
/// Returns a 400 when the password is shorter than [`MIN_PASSWORD_LEN`].
pub fn check_policy(password: &str) -> ApiResult<()> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::bad_request(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long"
        )));
    }
    Ok(())
}

/// Hash a password with bcrypt at the default cost.
///
/// # Errors
///
/// Returns a 500 if hashing fails or the blocking task is cancelled.
pub async fn hash(password: String) -> ApiResult<String> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| AppError::internal(anyhow::Error::new(e).context("hash task failed")))?
        .map_err(|e| AppError::internal(anyhow::Error::new(e).context("bcrypt hash failed")))
}

/// Verify a password against a stored hash.
///
/// # Errors
///
/// Returns a 500 if the stored hash is malformed or the blocking task is
/// cancelled. A wrong password is `Ok(false)`, not an error.
pub async fn verify(password: String, password_hash: String) -> ApiResult<bool> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &password_hash))
        .await
        .map_err(|e| AppError::internal(anyhow::Error::new(e).context("verify task failed")))?
        .map_err(|e| AppError::internal(anyhow::Error::new(e).context("bcrypt verify failed")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn policy_rejects_short_passwords() {
        assert!(check_policy("12345").is_err());
        assert!(check_policy("").is_err());
        assert!(check_policy("123456").is_ok());
    }

    #[tokio::test]
    async fn verify_accepts_the_right_password() {
        // Low cost keeps the test fast; production uses DEFAULT_COST.
        let stored = bcrypt::hash("hunter22", 4).unwrap();
        assert!(verify("hunter22".into(), stored.clone()).await.unwrap());
        assert!(!verify("hunter23".into(), stored).await.unwrap());
    }

    #[tokio::test]
    async fn malformed_hash_is_an_internal_error() {
        let result = verify("anything".into(), "not-a-bcrypt-hash".into()).await;
        assert!(result.is_err());
    }
}
