//! Password hashing using Argon2

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher as Argon2PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use std::fmt::Debug;

use crate::domain::DomainError;

/// Salted one-way password hashing
pub trait PasswordHasher: Send + Sync + Debug {
    /// Hash a password under a fresh random salt
    fn hash(&self, password: &str) -> Result<String, DomainError>;

    /// Verify a password against a stored digest
    ///
    /// An empty or malformed digest never verifies.
    fn verify(&self, password: &str, digest: &str) -> bool;
}

/// Argon2id hasher producing PHC-format digests
#[derive(Debug, Clone, Default)]
pub struct Argon2Hasher;

impl Argon2Hasher {
    pub fn new() -> Self {
        Self
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| DomainError::internal(format!("Failed to hash password: {}", e)))
    }

    fn verify(&self, password: &str, digest: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(digest) else {
            return false;
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = Argon2Hasher::new();
        let digest = hasher.hash("foobar").unwrap();

        assert!(digest.starts_with("$argon2"));
        assert!(!digest.contains("foobar"));
        assert!(hasher.verify("foobar", &digest));
        assert!(!hasher.verify("wrong", &digest));
    }

    #[test]
    fn test_digests_are_salted() {
        let hasher = Argon2Hasher::new();

        let first = hasher.hash("foobar").unwrap();
        let second = hasher.hash("foobar").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify("foobar", &first));
        assert!(hasher.verify("foobar", &second));
    }

    #[test]
    fn test_verify_missing_or_malformed_digest() {
        let hasher = Argon2Hasher::new();

        assert!(!hasher.verify("foobar", ""));
        assert!(!hasher.verify("foobar", "not-a-phc-string"));
    }
}
