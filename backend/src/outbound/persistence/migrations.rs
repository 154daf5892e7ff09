//! Embedded schema migrations.
//!
//! Migrations ship inside the binary and run once at startup when a database
//! is configured. The runner uses a blocking wrapper around the async
//! connection, so call it from a blocking context.

use diesel::Connection;
use diesel_async::AsyncPgConnection;
use diesel_async::async_connection_wrapper::AsyncConnectionWrapper;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

/// Migrations embedded from the crate's `migrations/` directory.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Errors raised while applying migrations.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// Could not connect to the database.
    #[error("failed to connect for migrations: {message}")]
    Connection {
        /// Underlying failure description.
        message: String,
    },
    /// A migration failed to apply.
    #[error("failed to run migrations: {message}")]
    Execution {
        /// Underlying failure description.
        message: String,
    },
}

/// Apply any pending migrations. Blocking; run via `spawn_blocking`.
pub fn run_pending_migrations(database_url: &str) -> Result<(), MigrationError> {
    let mut conn: AsyncConnectionWrapper<AsyncPgConnection> =
        AsyncConnectionWrapper::establish(database_url).map_err(|err| {
            MigrationError::Connection {
                message: err.to_string(),
            }
        })?;

    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| MigrationError::Execution {
            message: err.to_string(),
        })?;

    info!(count = applied.len(), "database migrations applied");
    Ok(())
}
