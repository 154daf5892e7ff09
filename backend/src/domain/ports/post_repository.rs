//! Driven port for post persistence adapters and their errors.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::post::{Post, PostBody, PostId, PostTitle};
use crate::domain::user::User;

/// Persistence errors raised by post repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PostPersistenceError {
    /// Repository connection could not be established.
    #[error("post repository connection failed: {message}")]
    Connection {
        /// Underlying failure description.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("post repository query failed: {message}")]
    Query {
        /// Underlying failure description.
        message: String,
    },
}

impl PostPersistenceError {
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

/// Storage port owning the `posts` table.
///
/// Every method is a single statement and commits on its own; no
/// multi-statement transaction spans repository calls.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Persist a new post, returning it with the assigned id and timestamp.
    async fn insert(
        &self,
        author: &User,
        title: &PostTitle,
        body: &PostBody,
    ) -> Result<Post, PostPersistenceError>;

    /// Fetch a post joined with its author's username.
    async fn find_with_author(&self, id: PostId) -> Result<Option<Post>, PostPersistenceError>;

    /// Overwrite a post's title and body.
    async fn update_content(
        &self,
        id: PostId,
        title: &PostTitle,
        body: &PostBody,
    ) -> Result<(), PostPersistenceError>;

    /// Remove a post row. Removing an already-absent row is not an error.
    async fn delete(&self, id: PostId) -> Result<(), PostPersistenceError>;
}

#[derive(Default)]
struct MemoryPostState {
    next_id: i32,
    rows: BTreeMap<i32, Post>,
}

/// In-memory [`PostRepository`] used by tests and database-less deployments.
#[derive(Default)]
pub struct MemoryPostRepository {
    state: Mutex<MemoryPostState>,
}

impl MemoryPostRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryPostState> {
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Number of stored rows, exposed for persistence assertions in tests.
    pub fn row_count(&self) -> usize {
        self.lock().rows.len()
    }
}

#[async_trait]
impl PostRepository for MemoryPostRepository {
    async fn insert(
        &self,
        author: &User,
        title: &PostTitle,
        body: &PostBody,
    ) -> Result<Post, PostPersistenceError> {
        let mut state = self.lock();
        state.next_id += 1;
        let post = Post::new(
            PostId::new(state.next_id),
            author.id(),
            author.username().clone(),
            title.clone(),
            body.clone(),
            Utc::now(),
        );
        let id = state.next_id;
        state.rows.insert(id, post.clone());
        Ok(post)
    }

    async fn find_with_author(&self, id: PostId) -> Result<Option<Post>, PostPersistenceError> {
        Ok(self.lock().rows.get(&id.as_i32()).cloned())
    }

    async fn update_content(
        &self,
        id: PostId,
        title: &PostTitle,
        body: &PostBody,
    ) -> Result<(), PostPersistenceError> {
        let mut state = self.lock();
        if let Some(post) = state.rows.remove(&id.as_i32()) {
            state.rows.insert(
                id.as_i32(),
                post.with_content(title.clone(), body.clone()),
            );
        }
        Ok(())
    }

    async fn delete(&self, id: PostId) -> Result<(), PostPersistenceError> {
        self.lock().rows.remove(&id.as_i32());
        Ok(())
    }
}
