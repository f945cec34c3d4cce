use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("password hashing failed")]
    HashingFailed,
    #[error("stored hash is not a valid PHC string")]
    InvalidHashFormat,
}

/// Hash a plaintext password with argon2id and a fresh random salt.
///
/// Returns the PHC string (salt included), which is what gets stored.
/// The plaintext is never persisted anywhere.
pub fn hash(plain: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let hashed = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|_| PasswordError::HashingFailed)?;

    Ok(hashed.to_string())
}

/// Check a plaintext candidate against a stored PHC hash.
pub fn verify(plain: &str, stored: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(stored).map_err(|_| PasswordError::InvalidHashFormat)?;

    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hashed = hash("password1").unwrap();

        assert!(hashed.starts_with("$argon2id$"));
        assert!(verify("password1", &hashed).unwrap());
        assert!(!verify("password2", &hashed).unwrap());
    }

    #[test]
    fn test_same_password_different_hashes() {
        let first = hash("password1").unwrap();
        let second = hash("password1").unwrap();

        // Fresh salt per call
        assert_ne!(first, second);
        assert!(verify("password1", &first).unwrap());
        assert!(verify("password1", &second).unwrap());
    }

    #[test]
    fn test_invalid_stored_hash() {
        let result = verify("password1", "not-a-phc-string");
        assert!(matches!(result, Err(PasswordError::InvalidHashFormat)));
    }
}
