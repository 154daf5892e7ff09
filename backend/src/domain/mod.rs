//! Domain primitives, services, and ports.
//!
//! Purpose: define strongly typed domain entities used by the HTTP and
//! persistence layers. Types are immutable and document their invariants and
//! serialisation contracts (serde) in each type's Rustdoc. Everything here is
//! transport agnostic; inbound adapters own the HTTP mapping.

pub mod credential_service;
pub mod credentials;
pub mod error;
pub mod password;
pub mod ports;
pub mod post;
pub mod post_service;
pub mod user;

pub use self::credential_service::CredentialService;
pub use self::credentials::{CredentialRecord, Credentials, CredentialsValidationError};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::password::{PasswordHash, PasswordHashError};
pub use self::post::{
    Ownership, Post, PostBody, PostDraft, PostId, PostTitle, PostValidationError,
};
pub use self::post_service::PostService;
pub use self::user::{User, UserId, UserValidationError, Username};
