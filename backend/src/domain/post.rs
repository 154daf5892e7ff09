//! Post data model.
//!
//! A post belongs to exactly one author. The read model carries the author's
//! username so display surfaces never need a second lookup.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::user::{UserId, Username};

/// Validation errors for post content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostValidationError {
    /// Title was missing or blank once trimmed.
    EmptyTitle,
    /// Title exceeded the storage column width.
    TitleTooLong {
        /// Maximum accepted length in characters.
        max: usize,
    },
    /// Body was missing or blank once trimmed.
    EmptyBody,
}

impl fmt::Display for PostValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::TitleTooLong { max } => write!(f, "title must be at most {max} characters"),
            Self::EmptyBody => write!(f, "body must not be empty"),
        }
    }
}

impl std::error::Error for PostValidationError {}

/// Stable post identifier assigned by the storage layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(i32);

impl PostId {
    /// Wrap a raw storage identifier.
    pub fn new(id: i32) -> Self {
        Self(id)
    }

    /// Raw integer value for queries and URLs.
    pub fn as_i32(self) -> i32 {
        self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for PostId {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

/// Maximum allowed length for a post title.
pub const TITLE_MAX: usize = 255;

/// Non-empty post title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PostTitle(String);

impl PostTitle {
    /// Validate and construct a [`PostTitle`].
    pub fn new(title: impl Into<String>) -> Result<Self, PostValidationError> {
        Self::from_owned(title.into())
    }

    fn from_owned(title: String) -> Result<Self, PostValidationError> {
        if title.trim().is_empty() {
            return Err(PostValidationError::EmptyTitle);
        }
        if title.chars().count() > TITLE_MAX {
            return Err(PostValidationError::TitleTooLong { max: TITLE_MAX });
        }
        Ok(Self(title))
    }
}

impl AsRef<str> for PostTitle {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PostTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<PostTitle> for String {
    fn from(value: PostTitle) -> Self {
        value.0
    }
}

impl TryFrom<String> for PostTitle {
    type Error = PostValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Non-empty post body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PostBody(String);

impl PostBody {
    /// Validate and construct a [`PostBody`].
    pub fn new(body: impl Into<String>) -> Result<Self, PostValidationError> {
        Self::from_owned(body.into())
    }

    fn from_owned(body: String) -> Result<Self, PostValidationError> {
        if body.trim().is_empty() {
            return Err(PostValidationError::EmptyBody);
        }
        Ok(Self(body))
    }
}

impl AsRef<str> for PostBody {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<PostBody> for String {
    fn from(value: PostBody) -> Self {
        value.0
    }
}

impl TryFrom<String> for PostBody {
    type Error = PostValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Validated content for a post, used both at creation and on update.
///
/// Title and body are both required so the stored-post invariants hold
/// across every mutation path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    title: PostTitle,
    body: PostBody,
}

impl PostDraft {
    /// Construct a draft from raw title/body inputs.
    pub fn try_from_parts(title: &str, body: &str) -> Result<Self, PostValidationError> {
        Ok(Self {
            title: PostTitle::new(title)?,
            body: PostBody::new(body)?,
        })
    }

    /// Draft title.
    pub fn title(&self) -> &PostTitle {
        &self.title
    }

    /// Draft body.
    pub fn body(&self) -> &PostBody {
        &self.body
    }

    /// Split the draft into its validated parts.
    pub fn into_parts(self) -> (PostTitle, PostBody) {
        (self.title, self.body)
    }
}

/// Whether a read must verify the requester is the post's author.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// Reject requesters other than the author with a forbidden error.
    EnforceAuthor,
    /// Allow any authenticated reader.
    AnyReader,
}

/// A stored post joined with its author's username for display.
///
/// ## Invariants
/// - `author_id` references an existing user; the join supplies
///   `author_username` from the same row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
#[serde(try_from = "PostDto", into = "PostDto")]
pub struct Post {
    #[schema(value_type = i32, example = 1)]
    id: PostId,
    #[schema(value_type = i32, example = 1)]
    author_id: UserId,
    #[schema(value_type = String, example = "alice")]
    author_username: Username,
    #[schema(value_type = String, example = "First post")]
    title: PostTitle,
    #[schema(value_type = String, example = "Hello, world.")]
    body: PostBody,
    /// Creation timestamp assigned by the storage layer.
    #[schema(value_type = String, format = DateTime)]
    created: DateTime<Utc>,
}

impl Post {
    /// Build a [`Post`] from validated components.
    pub fn new(
        id: PostId,
        author_id: UserId,
        author_username: Username,
        title: PostTitle,
        body: PostBody,
        created: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            author_id,
            author_username,
            title,
            body,
            created,
        }
    }

    /// Stable post identifier.
    pub fn id(&self) -> PostId {
        self.id
    }

    /// Identifier of the owning author.
    pub fn author_id(&self) -> UserId {
        self.author_id
    }

    /// Username of the owning author.
    pub fn author_username(&self) -> &Username {
        &self.author_username
    }

    /// Post title.
    pub fn title(&self) -> &PostTitle {
        &self.title
    }

    /// Post body.
    pub fn body(&self) -> &PostBody {
        &self.body
    }

    /// Creation timestamp.
    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    /// Copy of this post with its content replaced by an applied update.
    pub fn with_content(mut self, title: PostTitle, body: PostBody) -> Self {
        self.title = title;
        self.body = body;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PostDto {
    id: i32,
    author_id: i32,
    author_username: String,
    title: String,
    body: String,
    created: DateTime<Utc>,
}

impl From<Post> for PostDto {
    fn from(value: Post) -> Self {
        Self {
            id: value.id.as_i32(),
            author_id: value.author_id.as_i32(),
            author_username: value.author_username.into(),
            title: value.title.into(),
            body: value.body.into(),
            created: value.created,
        }
    }
}

/// Conversion failures surfaced while deserializing a [`Post`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostDtoError {
    /// Post content failed validation.
    Content(PostValidationError),
    /// Author username failed validation.
    Author(super::user::UserValidationError),
}

impl fmt::Display for PostDtoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Content(err) => write!(f, "{err}"),
            Self::Author(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for PostDtoError {}

impl TryFrom<PostDto> for Post {
    type Error = PostDtoError;

    fn try_from(value: PostDto) -> Result<Self, Self::Error> {
        Ok(Self::new(
            PostId::new(value.id),
            UserId::new(value.author_id),
            Username::new(value.author_username).map_err(PostDtoError::Author)?,
            PostTitle::new(value.title).map_err(PostDtoError::Content)?,
            PostBody::new(value.body).map_err(PostDtoError::Content)?,
            value.created,
        ))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    #[case("", "body", PostValidationError::EmptyTitle)]
    #[case("   ", "body", PostValidationError::EmptyTitle)]
    #[case("title", "", PostValidationError::EmptyBody)]
    #[case("title", "   ", PostValidationError::EmptyBody)]
    #[case(&"t".repeat(TITLE_MAX + 1), "body", PostValidationError::TitleTooLong { max: TITLE_MAX })]
    fn invalid_drafts_are_rejected(
        #[case] title: &str,
        #[case] body: &str,
        #[case] expected: PostValidationError,
    ) {
        let err = PostDraft::try_from_parts(title, body).expect_err("invalid draft must fail");
        assert_eq!(err, expected);
    }

    #[test]
    fn drafts_split_into_their_validated_parts() {
        let draft = PostDraft::try_from_parts("T", "B").expect("valid draft");
        let (title, body) = draft.into_parts();
        assert_eq!(title.as_ref(), "T");
        assert_eq!(body.as_ref(), "B");
    }

    #[test]
    fn post_serializes_to_camel_case() {
        let post = Post::new(
            PostId::new(3),
            UserId::new(1),
            Username::new("alice").expect("valid username"),
            PostTitle::new("T").expect("valid title"),
            PostBody::new("B").expect("valid body"),
            "2026-08-01T12:00:00Z".parse().expect("valid timestamp"),
        );

        let value = serde_json::to_value(&post).expect("serialize post");
        assert_eq!(value.get("authorUsername"), Some(&json!("alice")));
        assert_eq!(value.get("authorId"), Some(&json!(1)));
        assert!(value.get("author_username").is_none());
    }
}
