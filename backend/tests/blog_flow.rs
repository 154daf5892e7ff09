//! End-to-end flows over the domain services with in-memory repositories.
//!
//! These tests exercise the registration, login-verification, and post
//! lifecycle contracts without any HTTP or database plumbing; the handler
//! tests cover the same flows through the cookie session middleware.

use std::sync::Arc;

use backend::domain::ports::{CredentialStore, MemoryPostRepository, MemoryUserRepository, PostStore};
use backend::domain::{
    CredentialService, Credentials, ErrorCode, Ownership, PostDraft, PostService,
};

fn credentials(username: &str, password: &str) -> Credentials {
    Credentials::try_from_parts(username, password).expect("valid credentials")
}

fn draft(title: &str, body: &str) -> PostDraft {
    PostDraft::try_from_parts(title, body).expect("valid draft")
}

fn services() -> (CredentialService, PostService, Arc<MemoryPostRepository>) {
    let posts = Arc::new(MemoryPostRepository::new());
    (
        CredentialService::new(Arc::new(MemoryUserRepository::new())),
        PostService::new(posts.clone()),
        posts,
    )
}

#[tokio::test]
async fn alice_registers_logs_in_and_manages_her_post() {
    let (credential_store, post_store, _) = services();

    let alice = credential_store
        .register(&credentials("alice", "pw1"))
        .await
        .expect("registration succeeds");

    let session_user = credential_store
        .verify(&credentials("alice", "pw1"))
        .await
        .expect("login verification succeeds");
    assert_eq!(session_user, alice.id());

    let created = post_store
        .create(&alice, draft("T", "B"))
        .await
        .expect("create succeeds");
    assert_eq!(created.author_id(), alice.id());

    let updated = post_store
        .update(created.id(), session_user, draft("T2", "B2"))
        .await
        .expect("update succeeds");
    assert_eq!(updated.title().as_ref(), "T2");

    let fetched = post_store
        .get(created.id(), session_user, Ownership::EnforceAuthor)
        .await
        .expect("get succeeds");
    assert_eq!(fetched.title().as_ref(), "T2");
    assert_eq!(fetched.body().as_ref(), "B2");

    post_store
        .delete(created.id(), session_user)
        .await
        .expect("delete succeeds");

    let err = post_store
        .get(created.id(), session_user, Ownership::AnyReader)
        .await
        .expect_err("deleted post must be gone");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn bob_cannot_touch_alices_post() {
    let (credential_store, post_store, posts) = services();

    let alice = credential_store
        .register(&credentials("alice", "pw1"))
        .await
        .expect("alice registers");
    let bob = credential_store
        .register(&credentials("bob", "pw2"))
        .await
        .expect("bob registers");

    let bob_session = credential_store
        .verify(&credentials("bob", "pw2"))
        .await
        .expect("bob logs in");
    assert_eq!(bob_session, bob.id());

    let post = post_store
        .create(&alice, draft("T", "B"))
        .await
        .expect("alice creates a post");

    let err = post_store
        .update(post.id(), bob_session, draft("T2", "B2"))
        .await
        .expect_err("bob must not update alice's post");
    assert_eq!(err.code(), ErrorCode::Forbidden);

    let err = post_store
        .delete(post.id(), bob_session)
        .await
        .expect_err("bob must not delete alice's post");
    assert_eq!(err.code(), ErrorCode::Forbidden);

    let unchanged = post_store
        .get(post.id(), alice.id(), Ownership::EnforceAuthor)
        .await
        .expect("alice still reads her post");
    assert_eq!(unchanged.title().as_ref(), "T");
    assert_eq!(posts.row_count(), 1);
}

#[tokio::test]
async fn duplicate_registration_leaves_exactly_one_account() {
    let (credential_store, _, _) = services();

    credential_store
        .register(&credentials("alice", "pw1"))
        .await
        .expect("first registration succeeds");
    let err = credential_store
        .register(&credentials("alice", "pw2"))
        .await
        .expect_err("second registration must conflict");
    assert_eq!(err.code(), ErrorCode::Conflict);

    // The surviving row still carries the original password.
    credential_store
        .verify(&credentials("alice", "pw1"))
        .await
        .expect("original password still verifies");
    let err = credential_store
        .verify(&credentials("alice", "pw2"))
        .await
        .expect_err("second password never landed");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

#[tokio::test]
async fn invalid_drafts_persist_no_rows() {
    let (_, _, posts) = services();

    assert!(PostDraft::try_from_parts("", "B").is_err());
    assert!(PostDraft::try_from_parts("T", "").is_err());
    assert_eq!(posts.row_count(), 0);
}
