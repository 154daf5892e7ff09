//! Post store enforcing author ownership over a driven repository.

use std::sync::Arc;

use async_trait::async_trait;

use super::error::Error;
use super::ports::{PostPersistenceError, PostRepository, PostStore};
use super::post::{Ownership, Post, PostDraft, PostId};
use super::user::{User, UserId};

/// [`PostStore`] implementation over a driven [`PostRepository`].
///
/// `update` and `delete` route through [`PostStore::get`] with ownership
/// enforced, so the author check exists in exactly one place.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
}

impl PostService {
    /// Create a new service backed by the given post repository.
    pub fn new(posts: Arc<dyn PostRepository>) -> Self {
        Self { posts }
    }
}

fn map_persistence_error(error: PostPersistenceError) -> Error {
    match error {
        PostPersistenceError::Connection { message } => Error::service_unavailable(message),
        PostPersistenceError::Query { message } => Error::internal(message),
    }
}

/// The single ownership predicate: acting user must equal the post's author.
fn ensure_author(post: &Post, requester: UserId) -> Result<(), Error> {
    if post.author_id() == requester {
        Ok(())
    } else {
        Err(Error::forbidden("only the author may modify this post"))
    }
}

#[async_trait]
impl PostStore for PostService {
    async fn create(&self, author: &User, draft: PostDraft) -> Result<Post, Error> {
        self.posts
            .insert(author, draft.title(), draft.body())
            .await
            .map_err(map_persistence_error)
    }

    async fn get(
        &self,
        id: PostId,
        requester: UserId,
        ownership: Ownership,
    ) -> Result<Post, Error> {
        let post = self
            .posts
            .find_with_author(id)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| Error::not_found("no such post"))?;

        if ownership == Ownership::EnforceAuthor {
            ensure_author(&post, requester)?;
        }
        Ok(post)
    }

    async fn update(
        &self,
        id: PostId,
        requester: UserId,
        draft: PostDraft,
    ) -> Result<Post, Error> {
        let existing = self.get(id, requester, Ownership::EnforceAuthor).await?;

        let (title, body) = draft.into_parts();
        self.posts
            .update_content(id, &title, &body)
            .await
            .map_err(map_persistence_error)?;

        Ok(existing.with_content(title, body))
    }

    async fn delete(&self, id: PostId, requester: UserId) -> Result<(), Error> {
        self.get(id, requester, Ownership::EnforceAuthor).await?;
        self.posts.delete(id).await.map_err(map_persistence_error)
    }
}
