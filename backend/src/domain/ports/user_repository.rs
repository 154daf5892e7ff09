//! Driven port for user persistence adapters and their errors.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::credentials::CredentialRecord;
use crate::domain::password::PasswordHash;
use crate::domain::user::{User, UserId, Username};

/// Persistence errors raised by user repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserPersistenceError {
    /// Repository connection could not be established.
    #[error("user repository connection failed: {message}")]
    Connection {
        /// Underlying failure description.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("user repository query failed: {message}")]
    Query {
        /// Underlying failure description.
        message: String,
    },
    /// The unique-username constraint rejected an insert.
    ///
    /// This is the authoritative duplicate signal; callers must not rely on
    /// a prior existence check staying true at insert time.
    #[error("username is already registered")]
    Duplicate,
}

impl UserPersistenceError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Storage port owning the `users` table.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user, returning the stored identity with its assigned id.
    async fn insert(
        &self,
        username: &Username,
        password_hash: &PasswordHash,
    ) -> Result<User, UserPersistenceError>;

    /// Fetch a user with credential material by username.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<CredentialRecord>, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;
}

#[derive(Default)]
struct MemoryUserState {
    next_id: i32,
    rows: BTreeMap<i32, CredentialRecord>,
}

/// In-memory [`UserRepository`] used by tests and database-less deployments.
///
/// The username uniqueness check runs under the same lock as the insert, so
/// the duplicate signal is as authoritative as the SQL constraint it stands
/// in for.
#[derive(Default)]
pub struct MemoryUserRepository {
    state: Mutex<MemoryUserState>,
}

impl MemoryUserRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryUserState> {
        // Lock poisoning only happens after a panic in another test thread;
        // recover the inner state rather than cascading the panic.
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn insert(
        &self,
        username: &Username,
        password_hash: &PasswordHash,
    ) -> Result<User, UserPersistenceError> {
        let mut state = self.lock();
        if state
            .rows
            .values()
            .any(|record| record.user.username() == username)
        {
            return Err(UserPersistenceError::Duplicate);
        }

        state.next_id += 1;
        let user = User::new(UserId::new(state.next_id), username.clone());
        let id = state.next_id;
        state.rows.insert(
            id,
            CredentialRecord {
                user: user.clone(),
                password_hash: password_hash.clone(),
            },
        );
        Ok(user)
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<CredentialRecord>, UserPersistenceError> {
        let state = self.lock();
        Ok(state
            .rows
            .values()
            .find(|record| record.user.username() == username)
            .cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let state = self.lock();
        Ok(state.rows.get(&id.as_i32()).map(|record| record.user.clone()))
    }
}
