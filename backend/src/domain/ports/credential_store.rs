//! Driving port for credential use-cases.
//!
//! Inbound adapters call this port to register, verify, and resolve users
//! without knowing (or importing) the backing infrastructure, which keeps
//! HTTP handler tests deterministic because they can substitute a test
//! double instead of wiring persistence.

use async_trait::async_trait;

use crate::domain::credentials::Credentials;
use crate::domain::error::Error;
use crate::domain::user::{User, UserId};

/// Domain use-case port for the credential store.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Create a new user from validated credentials.
    ///
    /// Fails with a conflict error when the username is already registered.
    async fn register(&self, credentials: &Credentials) -> Result<User, Error>;

    /// Validate credentials and return the matching user id.
    ///
    /// Fails with a not-found error for unknown usernames and an
    /// unauthorized error for hash mismatches.
    async fn verify(&self, credentials: &Credentials) -> Result<UserId, Error>;

    /// Resolve a stored user id, typically one read from a session.
    async fn find_user(&self, id: UserId) -> Result<Option<User>, Error>;
}
