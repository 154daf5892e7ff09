//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{CredentialStore, MemoryPostRepository, MemoryUserRepository, PostStore};
use crate::domain::{CredentialService, PostService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Credential store resolving registration, login, and session subjects.
    pub credentials: Arc<dyn CredentialStore>,
    /// Author-scoped post operations.
    pub posts: Arc<dyn PostStore>,
}

impl HttpState {
    /// Construct state from port implementations.
    pub fn new(credentials: Arc<dyn CredentialStore>, posts: Arc<dyn PostStore>) -> Self {
        Self { credentials, posts }
    }

    /// State backed entirely by in-memory repositories.
    ///
    /// Used by handler tests and by deployments without a configured
    /// database.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(CredentialService::new(Arc::new(MemoryUserRepository::new()))),
            Arc::new(PostService::new(Arc::new(MemoryPostRepository::new()))),
        )
    }
}
