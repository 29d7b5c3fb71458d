//! Password hashing and verification using Argon2

use crate::error::{AuthError, AuthResult};
use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

/// Credential hashing capability.
pub trait CredentialHasher: Send + Sync {
    /// Hash a plaintext password into a storable digest.
    fn hash(&self, password: &str) -> AuthResult<String>;

    /// Check a plaintext password against a digest.
    ///
    /// A mismatch is `Ok(false)`; only an unreadable digest is an error.
    fn verify(&self, password: &str, digest: &str) -> AuthResult<bool>;
}

/// Argon2id hasher producing PHC strings with a random salt.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Hasher;

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> AuthResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let digest = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::Internal(format!("Failed to hash password: {}", e)))?;

        Ok(digest.to_string())
    }

    fn verify(&self, password: &str, digest: &str) -> AuthResult<bool> {
        let parsed = PasswordHash::new(digest)
            .map_err(|e| AuthError::Internal(format!("Failed to parse password hash: {}", e)))?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::Internal(format!(
                "Password verification failed: {}",
                e
            ))),
        }
    }
}
