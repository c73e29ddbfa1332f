use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as _;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Argon2;

use super::errors::PasswordError;

/// Well-formed Argon2id hash that no password matches.
///
/// Verified in place of a real hash when no identity record exists, so a
/// failed lookup costs as much as a wrong password.
pub const DECOY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// Checks a plaintext secret against a stored hash.
///
/// The session manager only depends on this seam; how hashes are produced
/// is up to the implementation.
pub trait CredentialVerifier: Send + Sync + 'static {
    /// Verify a password against a stored hash.
    ///
    /// # Returns
    /// True if the password matches, false otherwise
    ///
    /// # Errors
    /// * `InvalidHash` - The stored hash cannot be parsed
    fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordError>;
}

/// Salted adaptive password hashing with Argon2id.
///
/// Uses the library's recommended parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2PasswordHasher;

impl Argon2PasswordHasher {
    pub fn new() -> Self {
        Self
    }

    /// Hash a plaintext password for storage.
    ///
    /// # Returns
    /// PHC string (algorithm, parameters, salt and hash)
    ///
    /// # Errors
    /// * `HashingFailed` - Password hashing operation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }
}

impl CredentialVerifier for Argon2PasswordHasher {
    fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash =
            PasswordHash::new(stored_hash).map_err(|e| PasswordError::InvalidHash(e.to_string()))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = Argon2PasswordHasher::new();
        let hash = hasher.hash("my_secret_password").expect("Failed to hash password");

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify("my_secret_password", &hash).unwrap());
        assert!(!hasher.verify("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_same_password_gets_distinct_salts() {
        let hasher = Argon2PasswordHasher::new();
        let first = hasher.hash("repeat").unwrap();
        let second = hasher.hash("repeat").unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_decoy_hash_parses_and_matches_nothing() {
        let hasher = Argon2PasswordHasher::new();

        for password in ["", "password", "pass_word!"] {
            assert!(!hasher.verify(password, DECOY_HASH).unwrap());
        }
    }

    #[test]
    fn test_verify_unreadable_hash() {
        let hasher = Argon2PasswordHasher::new();
        let result = hasher.verify("password", "not_a_phc_string");

        assert!(matches!(result, Err(PasswordError::InvalidHash(_))));
    }
}
