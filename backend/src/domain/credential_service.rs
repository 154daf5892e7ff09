//! Credential store backed by a user repository and argon2id hashing.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use super::credentials::Credentials;
use super::error::Error;
use super::password::PasswordHash;
use super::ports::{CredentialStore, UserPersistenceError, UserRepository};
use super::user::{User, UserId};

/// [`CredentialStore`] implementation over a driven [`UserRepository`].
///
/// Hashing happens here so repositories only ever see PHC strings.
#[derive(Clone)]
pub struct CredentialService {
    users: Arc<dyn UserRepository>,
}

impl CredentialService {
    /// Create a new service backed by the given user repository.
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

fn map_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => Error::service_unavailable(message),
        UserPersistenceError::Query { message } => Error::internal(message),
        UserPersistenceError::Duplicate => Error::conflict("username already registered")
            .with_details(json!({ "field": "username", "code": "duplicate_username" })),
    }
}

#[async_trait]
impl CredentialStore for CredentialService {
    async fn register(&self, credentials: &Credentials) -> Result<User, Error> {
        let hash = PasswordHash::generate(credentials.password())
            .map_err(|err| Error::internal(format!("password hashing failed: {err}")))?;

        self.users
            .insert(credentials.username(), &hash)
            .await
            .map_err(map_persistence_error)
    }

    async fn verify(&self, credentials: &Credentials) -> Result<UserId, Error> {
        let record = self
            .users
            .find_by_username(credentials.username())
            .await
            .map_err(map_persistence_error)?;

        match record {
            Some(record) => {
                if record.password_hash.verify(credentials.password()) {
                    Ok(record.user.id())
                } else {
                    Err(Error::unauthorized("invalid credentials"))
                }
            }
            None => {
                // Burn the same hashing work as the mismatch path so response
                // timing does not reveal whether the username exists.
                PasswordHash::dummy().verify(credentials.password());
                Err(Error::not_found("unknown username"))
            }
        }
    }

    async fn find_user(&self, id: UserId) -> Result<Option<User>, Error> {
        self.users.find_by_id(id).await.map_err(map_persistence_error)
    }
}
