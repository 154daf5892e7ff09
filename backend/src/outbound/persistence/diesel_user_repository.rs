//! PostgreSQL-backed `UserRepository` implementation using Diesel.
//!
//! A thin adapter translating between Diesel rows and domain types. The
//! unique-username constraint is the authoritative duplicate guard: a
//! unique-violation from the insert maps to the canonical duplicate error,
//! so no check-then-insert race exists at this layer.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{CredentialRecord, PasswordHash, User, UserId, Username};

use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the [`UserRepository`] port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            UserPersistenceError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            UserPersistenceError::Duplicate
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserPersistenceError::connection("database connection error")
        }
        DieselError::NotFound => UserPersistenceError::query("record not found"),
        _ => UserPersistenceError::query("database error"),
    }
}

fn row_to_user(row: &UserRow) -> Result<User, UserPersistenceError> {
    User::try_from_parts(row.id, row.username.clone())
        .map_err(|err| UserPersistenceError::query(format!("stored user is invalid: {err}")))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(
        &self,
        username: &Username,
        password_hash: &PasswordHash,
    ) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: UserRow = diesel::insert_into(users::table)
            .values(NewUserRow {
                username: username.as_ref(),
                password_hash: password_hash.as_str(),
            })
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_user(&row)
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<CredentialRecord>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::username.eq(username.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(|row| {
            Ok(CredentialRecord {
                user: row_to_user(&row)?,
                password_hash: PasswordHash::from_storage(row.password_hash),
            })
        })
        .transpose()
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .find(id.as_i32())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.as_ref().map(row_to_user).transpose()
    }
}

#[cfg(test)]
mod tests {
    //! Error-mapping coverage; live-database behaviour is exercised by the
    //! deployment's own environment.
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    use super::*;

    fn database_error(kind: DatabaseErrorKind) -> DieselError {
        DieselError::DatabaseError(kind, Box::new("boom".to_owned()))
    }

    #[test]
    fn unique_violations_map_to_the_duplicate_signal() {
        let mapped = map_diesel_error(database_error(DatabaseErrorKind::UniqueViolation));
        assert_eq!(mapped, UserPersistenceError::Duplicate);
    }

    #[test]
    fn closed_connections_map_to_connection_errors() {
        let mapped = map_diesel_error(database_error(DatabaseErrorKind::ClosedConnection));
        assert!(matches!(mapped, UserPersistenceError::Connection { .. }));
    }

    #[test]
    fn other_failures_map_to_query_errors() {
        let mapped = map_diesel_error(DieselError::NotFound);
        assert!(matches!(mapped, UserPersistenceError::Query { .. }));
    }

    #[test]
    fn pool_failures_map_to_connection_errors() {
        let mapped = map_pool_error(PoolError::checkout("pool exhausted"));
        assert!(matches!(mapped, UserPersistenceError::Connection { .. }));
    }
}
