//! Domain ports: driving use-case traits and driven storage traits.
//!
//! Driving ports (`CredentialStore`, `PostStore`) are what inbound adapters
//! depend on; driven ports (`UserRepository`, `PostRepository`) are what the
//! persistence layer implements. The in-memory repository adapters live next
//! to their traits so tests and database-less deployments share one
//! implementation.

mod credential_store;
mod post_repository;
mod post_store;
mod user_repository;

pub use credential_store::CredentialStore;
pub use post_repository::{MemoryPostRepository, PostPersistenceError, PostRepository};
pub use post_store::PostStore;
pub use user_repository::{MemoryUserRepository, UserPersistenceError, UserRepository};
