//! Driving port for post use-cases.

use async_trait::async_trait;

use crate::domain::error::Error;
use crate::domain::post::{Ownership, Post, PostDraft, PostId};
use crate::domain::user::{User, UserId};

/// Domain use-case port for author-scoped post operations.
///
/// The author check lives behind [`PostStore::get`]; `update` and `delete`
/// reuse it so there is exactly one ownership predicate in the system.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Persist a new post for the given author.
    async fn create(&self, author: &User, draft: PostDraft) -> Result<Post, Error>;

    /// Fetch a post, optionally verifying the requester is its author.
    async fn get(
        &self,
        id: PostId,
        requester: UserId,
        ownership: Ownership,
    ) -> Result<Post, Error>;

    /// Replace a post's content. Only the author may update.
    async fn update(
        &self,
        id: PostId,
        requester: UserId,
        draft: PostDraft,
    ) -> Result<Post, Error>;

    /// Remove a post. Only the author may delete.
    async fn delete(&self, id: PostId, requester: UserId) -> Result<(), Error>;
}
