//! Password hashing and verification.
//!
//! Uses Argon2id (hybrid mode) with default parameters and OsRng-generated
//! salts, producing PHC string format hashes for storage. There is no
//! decrypt or reverse operation.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

/// Hash a password for secure storage using Argon2id.
///
/// # Errors
///
/// Returns `argon2::password_hash::Error` if hashing fails (rare).
///
/// # Example
///
/// ```
/// use dermalens_auth::password::{hash_password, verify_password};
///
/// let hash = hash_password("hunter2").unwrap();
/// assert!(hash.starts_with("$argon2id$"));
/// assert!(verify_password("hunter2", &hash).unwrap());
/// ```
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against a stored Argon2 hash.
///
/// The underlying verifier compares digests in constant time, so early
/// mismatch does not produce a timing side channel.
///
/// # Returns
///
/// `Ok(true)` if the password matches the hash, `Ok(false)` if it doesn't.
/// Returns `Err` only if the stored hash format is invalid.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    let result = Argon2::default().verify_password(password.as_bytes(), &parsed_hash);
    Ok(result.is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_produces_phc_format() {
        let hash = hash_password("correct horse battery staple").unwrap();
        assert!(hash.starts_with("$argon2id$"), "Hash should use Argon2id");
    }

    #[test]
    fn test_verify_correct_password() {
        let hash = hash_password("correct horse battery staple").unwrap();
        assert!(verify_password("correct horse battery staple", &hash).unwrap());
    }

    #[test]
    fn test_verify_wrong_password() {
        let hash = hash_password("correct horse battery staple").unwrap();
        assert!(!verify_password("incorrect horse", &hash).unwrap());
    }

    #[test]
    fn test_same_password_different_salts() {
        let hash1 = hash_password("secret").unwrap();
        let hash2 = hash_password("secret").unwrap();

        assert_ne!(hash1, hash2, "Random salts should differ per hash");
        assert!(verify_password("secret", &hash1).unwrap());
        assert!(verify_password("secret", &hash2).unwrap());
    }

    #[test]
    fn test_verify_invalid_hash_format() {
        assert!(verify_password("secret", "not-a-phc-string").is_err());
    }
}
