//! Password hashing helpers (Argon2, PHC string format)

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::error::{OpsGateError, Result};

/// Hashes a plaintext password into a salted PHC string.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let phc = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| OpsGateError::HashingError(format!("failed to hash password: {}", e)))?;
    Ok(phc.to_string())
}

/// Checks a plaintext password against a stored PHC string.
///
/// Argon2 recomputes the full hash before comparing, so the check is
/// constant-time with respect to the stored hash. An unparseable stored
/// hash counts as a mismatch rather than surfacing a store defect to the
/// caller.
pub fn verify_password(phc: &str, password: &str) -> bool {
    match PasswordHash::new(phc) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            log::error!("stored password hash is not a valid PHC string: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_round_trip() {
        let phc = hash_password("correct horse battery staple").unwrap();
        assert!(phc.starts_with("$argon2"));
        assert!(verify_password(&phc, "correct horse battery staple"));
        assert!(!verify_password(&phc, "wrong password"));
    }

    #[test]
    fn test_corrupt_hash_is_mismatch() {
        assert!(!verify_password("not-a-phc-string", "anything"));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same input").unwrap();
        let b = hash_password("same input").unwrap();
        assert_ne!(a, b);
    }
}
