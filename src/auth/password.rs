//! Password hashing (argon2id, PHC string format)

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    Hash(String),

    #[error("Password does not match")]
    Mismatch,
}

/// Hash with a fresh random salt. The salt is embedded in the returned string.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::Hash(e.to_string()))
}

pub fn check_password(password: &str, hashed_password: &str) -> Result<(), PasswordError> {
    let parsed = PasswordHash::new(hashed_password).map_err(|e| PasswordError::Hash(e.to_string()))?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| PasswordError::Mismatch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_check() {
        let hashed = hash_password("secret123").unwrap();
        assert_ne!(hashed, "secret123");
        assert!(hashed.starts_with("$argon2"));
        assert_eq!(check_password("secret123", &hashed), Ok(()));
        assert_eq!(
            check_password("wrong-pass", &hashed),
            Err(PasswordError::Mismatch)
        );
    }

    #[test]
    fn test_same_password_different_salt() {
        let a = hash_password("secret123").unwrap();
        let b = hash_password("secret123").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_hash() {
        assert!(matches!(
            check_password("secret123", "not-a-phc-string"),
            Err(PasswordError::Hash(_))
        ));
    }
}
