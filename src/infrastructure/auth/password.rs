use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Minimum accepted password length
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Account password hashing
pub struct PasswordService;

impl PasswordService {
    /// Hash a password using Argon2
    pub fn hash(password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::Hash(e.to_string()))
    }

    /// Verify a password against a stored Argon2 hash
    pub fn verify(password: &str, hash: &str) -> Result<bool, PasswordError> {
        if !hash.starts_with("$argon2") {
            return Err(PasswordError::UnknownFormat);
        }

        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| PasswordError::Verify(e.to_string()))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

/// Password error types
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    Hash(String),
    #[error("Failed to verify password: {0}")]
    Verify(String),
    #[error("Unknown hash format")]
    UnknownFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = PasswordService::hash("popcorn-and-chill").unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(PasswordService::verify("popcorn-and-chill", &hash).unwrap());
        assert!(!PasswordService::verify("popcorn", &hash).unwrap());
    }

    #[test]
    fn test_same_password_gets_distinct_salts() {
        let a = PasswordService::hash("popcorn-and-chill").unwrap();
        let b = PasswordService::hash("popcorn-and-chill").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_foreign_hash_is_rejected() {
        assert!(matches!(
            PasswordService::verify("x", "$2b$12$abcdefghijklmnopqrstuv"),
            Err(PasswordError::UnknownFormat)
        ));
    }
}
