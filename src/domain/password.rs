//! Password value object and the encoder used to produce it.
//!
//! The encoder is a trait so services receive it through their
//! constructor instead of reaching for a global hasher.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::errors::{AppError, AppResult};

/// Hashed password value object.
#[derive(Clone)]
pub struct Password {
    hash: String,
}

// Don't expose hash in debug output
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Wrap an existing hash (from database).
    pub fn from_hash(hash: String) -> Self {
        Self { hash }
    }

    /// Get the hash string for storage.
    pub fn as_str(&self) -> &str {
        &self.hash
    }

    /// Consume and return the hash string.
    pub fn into_string(self) -> String {
        self.hash
    }
}

impl From<Password> for String {
    fn from(password: Password) -> Self {
        password.hash
    }
}

impl PartialEq for Password {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for Password {}

/// One-way password encoder.
pub trait PasswordEncoder: Send + Sync {
    /// Hash a raw password for storage.
    fn encode(&self, plain_text: &str) -> AppResult<Password>;

    /// Check a raw password against a stored hash.
    fn matches(&self, plain_text: &str, password: &Password) -> bool;
}

/// Argon2id encoder with a fresh random salt per hash.
#[derive(Default)]
pub struct Argon2Encoder {
    argon2: Argon2<'static>,
}

impl Argon2Encoder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PasswordEncoder for Argon2Encoder {
    fn encode(&self, plain_text: &str) -> AppResult<Password> {
        if plain_text.is_empty() {
            return Err(AppError::validation("Password is required"));
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hash failed: {}", e)))?;
        Ok(Password::from_hash(hash.to_string()))
    }

    fn matches(&self, plain_text: &str, password: &Password) -> bool {
        PasswordHash::new(password.as_str())
            .map(|parsed| {
                self.argon2
                    .verify_password(plain_text.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_and_verify() {
        let encoder = Argon2Encoder::new();
        let plain = "SecurePassword123!";
        let password = encoder.encode(plain).unwrap();

        assert_ne!(password.as_str(), plain);
        assert!(encoder.matches(plain, &password));
        assert!(!encoder.matches("WrongPassword123", &password));
    }

    #[test]
    fn test_password_from_hash() {
        let encoder = Argon2Encoder::new();
        let plain = "TestPassword123";
        let hash = encoder.encode(plain).unwrap().into_string();

        let restored = Password::from_hash(hash);
        assert!(encoder.matches(plain, &restored));
    }

    #[test]
    fn test_same_password_different_salts() {
        let encoder = Argon2Encoder::new();
        let plain = "SamePassword123";
        let pass1 = encoder.encode(plain).unwrap();
        let pass2 = encoder.encode(plain).unwrap();

        // Different salts produce different hashes
        assert_ne!(pass1, pass2);
        assert!(encoder.matches(plain, &pass1));
        assert!(encoder.matches(plain, &pass2));
    }

    #[test]
    fn test_empty_password_rejected() {
        let result = Argon2Encoder::new().encode("");
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_garbage_hash_never_matches() {
        let encoder = Argon2Encoder::new();
        let stored = Password::from_hash("not-a-phc-string".to_string());
        assert!(!encoder.matches("anything", &stored));
    }

    #[test]
    fn test_debug_redacts_hash() {
        let password = Password::from_hash("$argon2id$abc".to_string());
        assert!(!format!("{:?}", password).contains("argon2id"));
    }
}
