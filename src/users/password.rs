use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
#[error("password hashing failed: {0}")]
pub struct HashError(pub(crate) String);

/// Argon2id with the crate's default cost parameters and a fresh random salt.
pub fn hash_password(plain: &str) -> Result<String, HashError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            HashError(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

/// Runs `hash_password` on the blocking pool.
pub async fn hash_password_async(plain: String) -> Result<String, HashError> {
    tokio::task::spawn_blocking(move || hash_password(&plain))
        .await
        .map_err(|e| {
            error!(error = %e, "hashing task failed");
            HashError(e.to_string())
        })?
}

pub fn verify_password(plain: &str, hash: &str) -> Result<bool, HashError> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        HashError(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_hash_is_not_the_submitted_password() {
        let submitted = "analytical-engine";
        let stored = hash_password(submitted).expect("hashing should succeed");
        assert_ne!(stored, submitted);
        assert!(verify_password(submitted, &stored).expect("verify should succeed"));
    }

    #[test]
    fn another_users_password_does_not_verify() {
        let ada = hash_password("analytical-engine").expect("hashing should succeed");
        assert!(!verify_password("difference-engine", &ada).expect("verify should not error"));
    }

    #[test]
    fn two_users_with_one_password_store_different_hashes() {
        let ada = hash_password("bernoulli-numbers").unwrap();
        let augusta = hash_password("bernoulli-numbers").unwrap();
        assert_ne!(ada, augusta);
        assert!(ada.starts_with("$argon2id$"));
    }

    #[test]
    fn plaintext_in_the_password_column_is_an_error() {
        let err = verify_password("analytical-engine", "analytical-engine").unwrap_err();
        assert!(err.to_string().starts_with("password hashing failed"));
    }

    #[tokio::test]
    async fn async_hash_runs_off_the_executor() {
        let hash = hash_password_async("lovelace-1815".into()).await.unwrap();
        assert!(verify_password("lovelace-1815", &hash).unwrap());
    }
}
