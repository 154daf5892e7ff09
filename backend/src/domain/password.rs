//! Password hashing and verification.
//!
//! Passwords are hashed with argon2id (default parameters) and stored as PHC
//! strings. Plaintext never reaches a repository; verification failures are
//! indistinguishable from parse failures so stored-hash corruption cannot be
//! probed through the login path.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHasher, PasswordVerifier, SaltString};
use tracing::warn;

/// Fixed argon2id PHC string verified when a username is unknown, so the
/// known-user and unknown-user login paths cost the same wall-clock time.
const DUMMY_PHC: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$uJRPdDRQcPsy8modX4kBjg$CWOrkoo7oJBQ/45WwU1abs9hi/8RcKq8RH73icRDBB0";

/// Errors raised while hashing a password.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordHashError {
    /// The hashing primitive rejected the input.
    #[error("password hashing failed: {message}")]
    Hashing {
        /// Underlying failure description.
        message: String,
    },
}

impl PasswordHashError {
    /// Create a hashing error with the given message.
    pub fn hashing(message: impl Into<String>) -> Self {
        Self::Hashing {
            message: message.into(),
        }
    }
}

/// Salted, irreversible password hash in PHC string format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hash a plaintext password with a freshly generated salt.
    pub fn generate(password: &str) -> Result<Self, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| PasswordHashError::hashing(err.to_string()))?;
        Ok(Self(hash.to_string()))
    }

    /// Rehydrate a hash previously produced by [`PasswordHash::generate`].
    ///
    /// Storage is trusted; malformed values surface later as failed
    /// verification, never as a panic.
    pub fn from_storage(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Well-formed hash of no real password, used to equalise timing when a
    /// username lookup misses.
    pub fn dummy() -> Self {
        Self(DUMMY_PHC.to_owned())
    }

    /// Check a candidate password against this hash.
    pub fn verify(&self, candidate: &str) -> bool {
        let parsed = match argon2::password_hash::PasswordHash::new(&self.0) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!(error = %err, "stored password hash is malformed");
                return false;
            }
        };
        Argon2::default()
            .verify_password(candidate.as_bytes(), &parsed)
            .is_ok()
    }

    /// PHC string representation for persistence.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}
