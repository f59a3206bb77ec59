//! Password hashing
//!
//! Argon2id with a per-password random salt. The hash string embeds the
//! algorithm parameters and salt, so verification needs no extra state.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

#[derive(Debug, thiserror::Error)]
#[error("Password hashing failed")]
pub struct PasswordHashError;

/// Hash a password with Argon2id and a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, PasswordHashError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| PasswordHashError)
}

/// Verify a password against a stored hash. Any parse or mismatch is simply
/// "does not verify"; callers treat it as bad credentials.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    PasswordHash::new(stored_hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_original_password() {
        let hash = hash_password("p@ss1").unwrap();
        assert!(verify_password("p@ss1", &hash));
    }

    #[test]
    fn wrong_password_does_not_verify() {
        let hash = hash_password("p@ss1").unwrap();
        assert!(!verify_password("p@ss2", &hash));
    }

    #[test]
    fn hashes_are_salted() {
        // Same password, different salt, different hash
        let a = hash_password("p@ss1").unwrap();
        let b = hash_password("p@ss1").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn garbage_stored_hash_does_not_verify() {
        assert!(!verify_password("p@ss1", "not-a-phc-string"));
        assert!(!verify_password("p@ss1", ""));
    }
}
