//! PostgreSQL-backed `PostRepository` implementation using Diesel.
//!
//! Reads join the author row so the domain receives display-ready posts.
//! Each method is a single statement; autocommit is the transaction
//! boundary, matching the port contract.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{PostPersistenceError, PostRepository};
use crate::domain::{Post, PostBody, PostId, PostTitle, User, Username};

use super::models::{NewPostRow, PostContentChanges, PostRow};
use super::pool::{DbPool, PoolError};
use super::schema::{posts, users};

/// Diesel-backed implementation of the [`PostRepository`] port.
#[derive(Clone)]
pub struct DieselPostRepository {
    pool: DbPool,
}

impl DieselPostRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PostPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            PostPersistenceError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> PostPersistenceError {
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
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            PostPersistenceError::connection("database connection error")
        }
        DieselError::NotFound => PostPersistenceError::query("record not found"),
        _ => PostPersistenceError::query("database error"),
    }
}

fn row_to_post(row: PostRow, author_username: String) -> Result<Post, PostPersistenceError> {
    let invalid =
        |err: &dyn std::fmt::Display| PostPersistenceError::query(format!("stored post is invalid: {err}"));

    Ok(Post::new(
        PostId::new(row.id),
        row.author_id.into(),
        Username::new(author_username).map_err(|err| invalid(&err))?,
        PostTitle::new(row.title).map_err(|err| invalid(&err))?,
        PostBody::new(row.body).map_err(|err| invalid(&err))?,
        row.created,
    ))
}

#[async_trait]
impl PostRepository for DieselPostRepository {
    async fn insert(
        &self,
        author: &User,
        title: &PostTitle,
        body: &PostBody,
    ) -> Result<Post, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: PostRow = diesel::insert_into(posts::table)
            .values(NewPostRow {
                author_id: author.id().as_i32(),
                title: title.as_ref(),
                body: body.as_ref(),
            })
            .returning(PostRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_post(row, author.username().as_ref().to_owned())
    }

    async fn find_with_author(&self, id: PostId) -> Result<Option<Post>, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<(PostRow, String)> = posts::table
            .inner_join(users::table)
            .filter(posts::id.eq(id.as_i32()))
            .select((PostRow::as_select(), users::username))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(|(post, username)| row_to_post(post, username))
            .transpose()
    }

    async fn update_content(
        &self,
        id: PostId,
        title: &PostTitle,
        body: &PostBody,
    ) -> Result<(), PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::update(posts::table.find(id.as_i32()))
            .set(&PostContentChanges {
                title: title.as_ref(),
                body: body.as_ref(),
            })
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(())
    }

    async fn delete(&self, id: PostId) -> Result<(), PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::delete(posts::table.find(id.as_i32()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Error-mapping coverage; live-database behaviour is exercised by the
    //! deployment's own environment.
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    use super::*;

    #[test]
    fn closed_connections_map_to_connection_errors() {
        let error =
            DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, Box::new("boom".to_owned()));
        assert!(matches!(
            map_diesel_error(error),
            PostPersistenceError::Connection { .. }
        ));
    }

    #[test]
    fn pool_failures_map_to_connection_errors() {
        let mapped = map_pool_error(PoolError::build("bad url"));
        assert!(matches!(mapped, PostPersistenceError::Connection { .. }));
    }

    #[test]
    fn rows_with_blank_content_are_reported_as_invalid() {
        let row = PostRow {
            id: 1,
            author_id: 1,
            title: String::new(),
            body: "B".to_owned(),
            created: chrono::Utc::now(),
        };
        let err = row_to_post(row, "alice".to_owned()).expect_err("blank title must fail");
        assert!(matches!(err, PostPersistenceError::Query { .. }));
    }
}
