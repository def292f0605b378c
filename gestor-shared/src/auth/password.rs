/// Password hashing using Argon2id
///
/// Passwords are hashed with Argon2id and a per-password random salt, and
/// stored in PHC string format (`$argon2id$v=19$...`). The parameters are
/// embedded in the hash, so verification needs no external configuration.
///
/// # Example
///
/// ```
/// use gestor_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("super_secreta_123")?;
/// assert!(verify_password("super_secreta_123", &hash)?);
/// assert!(!verify_password("errada", &hash)?);
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    HashError(String),

    /// Failed to verify password
    #[error("Failed to verify password: {0}")]
    VerifyError(String),

    /// Invalid password hash format
    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),
}

/// Hashes a password using Argon2id with a random 16-byte salt
///
/// Returns the PHC string format hash, which embeds the algorithm,
/// parameters, salt, and digest.
///
/// # Errors
///
/// Returns `PasswordError::HashError` if hashing fails
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let argon2 = Argon2::default();

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(format!("Hash generation failed: {}", e)))?;

    Ok(password_hash.to_string())
}

/// Verifies a password against a stored hash
///
/// Comparison is constant-time. Returns `Ok(false)` for a wrong password;
/// errors are reserved for malformed hashes.
///
/// # Errors
///
/// Returns `PasswordError::InvalidHash` if the stored hash cannot be parsed,
/// `PasswordError::VerifyError` for other verification failures.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| PasswordError::InvalidHash(format!("Failed to parse hash: {}", e)))?;

    let argon2 = Argon2::default();

    match argon2.verify_password(password.as_bytes(), &parsed_hash) {
        Ok(_) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(format!(
            "Verification failed: {}",
            e
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password_format() {
        let hash = hash_password("uma_password").expect("Hash should succeed");
        assert!(hash.starts_with("$argon2id$"));
        assert!(hash.contains("v=19"));
    }

    #[test]
    fn test_hash_password_produces_different_salts() {
        let hash1 = hash_password("mesma_password").expect("Hash 1 should succeed");
        let hash2 = hash_password("mesma_password").expect("Hash 2 should succeed");

        // Different salts = different hashes
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_verify_password_correct() {
        let hash = hash_password("correta").expect("Hash should succeed");
        assert!(verify_password("correta", &hash).expect("Verify should succeed"));
    }

    #[test]
    fn test_verify_password_incorrect() {
        let hash = hash_password("correta").expect("Hash should succeed");
        assert!(!verify_password("errada", &hash).expect("Verify should succeed"));
    }

    #[test]
    fn test_verify_password_empty() {
        let hash = hash_password("correta").expect("Hash should succeed");
        assert!(!verify_password("", &hash).expect("Verify should succeed"));
    }

    #[test]
    fn test_verify_password_invalid_hash() {
        assert!(verify_password("password", "not_a_phc_string").is_err());
    }

    #[test]
    fn test_short_passwords_are_hashable() {
        // Registration accepts any non-empty password; hashing must not
        // impose a minimum length.
        let hash = hash_password("p").expect("Hash should succeed");
        assert!(verify_password("p", &hash).expect("Verify should succeed"));
    }
}
