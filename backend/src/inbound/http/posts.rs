//! Post handlers: create, read, update, delete.
//!
//! Every route requires an authenticated session; `update` and `delete`
//! additionally require the requester to be the post's author. Handlers only
//! extract parameters, resolve the session subject, and shape responses;
//! ownership and validation live in the domain.

use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;
use serde_json::json;

use crate::domain::{Error, Ownership, Post, PostDraft, PostId, PostValidationError, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Form payload for `POST /create` and `POST /update/{id}`.
///
/// Fields are optional so missing parameters surface as domain validation
/// errors rather than framework-level deserialisation failures.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct PostForm {
    /// Post title, required and non-empty.
    #[serde(default)]
    pub title: Option<String>,
    /// Post body, required and non-empty.
    #[serde(default)]
    pub body: Option<String>,
}

impl PostForm {
    fn into_draft(self) -> Result<PostDraft, PostValidationError> {
        PostDraft::try_from_parts(
            self.title.as_deref().unwrap_or(""),
            self.body.as_deref().unwrap_or(""),
        )
    }
}

fn map_post_validation_error(err: PostValidationError) -> Error {
    match err {
        PostValidationError::EmptyTitle => Error::invalid_request("title must not be empty")
            .with_details(json!({ "field": "title", "code": "empty_title" })),
        PostValidationError::TitleTooLong { max } => {
            Error::invalid_request(format!("title must be at most {max} characters"))
                .with_details(json!({ "field": "title", "code": "title_too_long" }))
        }
        PostValidationError::EmptyBody => Error::invalid_request("body must not be empty")
            .with_details(json!({ "field": "body", "code": "empty_body" })),
    }
}

/// Resolve the session subject to a full user record.
///
/// A session whose user id no longer resolves (for example after a database
/// reset) is treated as unauthenticated.
async fn current_user(session: &SessionContext, state: &HttpState) -> Result<User, Error> {
    let id = session.require_user()?;
    state
        .credentials
        .find_user(id)
        .await?
        .ok_or_else(|| Error::unauthorized("login required"))
}

/// Create a post owned by the session user.
#[utoipa::path(
    post,
    path = "/create",
    request_body(content = PostForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Post created", body = Post),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["posts"],
    operation_id = "createPost"
)]
#[post("/create")]
pub async fn create_post(
    session: SessionContext,
    state: web::Data<HttpState>,
    form: web::Form<PostForm>,
) -> ApiResult<web::Json<Post>> {
    let author = current_user(&session, &state).await?;
    let draft = form.into_inner().into_draft().map_err(map_post_validation_error)?;
    let post = state.posts.create(&author, draft).await?;
    Ok(web::Json(post))
}

/// Fetch a post for display. Any authenticated reader may view it.
#[utoipa::path(
    get,
    path = "/post/{id}",
    params(("id" = i32, Path, description = "Post identifier")),
    responses(
        (status = 200, description = "Post", body = Post),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["posts"],
    operation_id = "getPost"
)]
#[get("/post/{id}")]
pub async fn get_post(
    session: SessionContext,
    state: web::Data<HttpState>,
    id: web::Path<i32>,
) -> ApiResult<web::Json<Post>> {
    let reader = current_user(&session, &state).await?;
    let post = state
        .posts
        .get(PostId::new(id.into_inner()), reader.id(), Ownership::AnyReader)
        .await?;
    Ok(web::Json(post))
}

/// Replace a post's title and body. Only the author may update.
#[utoipa::path(
    post,
    path = "/update/{id}",
    params(("id" = i32, Path, description = "Post identifier")),
    request_body(content = PostForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Updated post", body = Post),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["posts"],
    operation_id = "updatePost"
)]
#[post("/update/{id}")]
pub async fn update_post(
    session: SessionContext,
    state: web::Data<HttpState>,
    id: web::Path<i32>,
    form: web::Form<PostForm>,
) -> ApiResult<web::Json<Post>> {
    let author = current_user(&session, &state).await?;
    let draft = form.into_inner().into_draft().map_err(map_post_validation_error)?;
    let post = state
        .posts
        .update(PostId::new(id.into_inner()), author.id(), draft)
        .await?;
    Ok(web::Json(post))
}

/// Delete a post. Only the author may delete.
#[utoipa::path(
    get,
    path = "/delete/{id}",
    params(("id" = i32, Path, description = "Post identifier")),
    responses(
        (status = 200, description = "Post deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["posts"],
    operation_id = "deletePost"
)]
#[get("/delete/{id}")]
pub async fn delete_post(
    session: SessionContext,
    state: web::Data<HttpState>,
    id: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let author = current_user(&session, &state).await?;
    state
        .posts
        .delete(PostId::new(id.into_inner()), author.id())
        .await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "post deleted" })))
}

#[cfg(test)]
mod tests {
    use actix_web::cookie::Cookie;
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test, web};
    use rstest::rstest;
    use serde_json::Value;

    use super::*;
    use crate::inbound::http::auth::{login, register};
    use crate::inbound::http::test_utils::test_session_middleware;

    type TestService = actix_web::dev::ServiceResponse;

    fn test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = TestService,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(HttpState::in_memory()))
            .wrap(test_session_middleware())
            .service(register)
            .service(login)
            .service(create_post)
            .service(get_post)
            .service(update_post)
            .service(delete_post)
    }

    /// Register and log in, returning the session cookie for later requests.
    async fn sign_in(
        app: &impl actix_web::dev::Service<
            actix_http::Request,
            Response = TestService,
            Error = actix_web::Error,
        >,
        username: &str,
        password: &str,
    ) -> Cookie<'static> {
        let response = actix_test::call_service(
            app,
            actix_test::TestRequest::post()
                .uri("/auth/register")
                .set_form([("username", username), ("password", password)])
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = actix_test::call_service(
            app,
            actix_test::TestRequest::post()
                .uri("/auth/login")
                .set_form([("username", username), ("password", password)])
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        response
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie")
            .into_owned()
    }

    async fn create(
        app: &impl actix_web::dev::Service<
            actix_http::Request,
            Response = TestService,
            Error = actix_web::Error,
        >,
        cookie: &Cookie<'static>,
        title: &str,
        body: &str,
    ) -> Value {
        let response = actix_test::call_service(
            app,
            actix_test::TestRequest::post()
                .uri("/create")
                .cookie(cookie.clone())
                .set_form([("title", title), ("body", body)])
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        serde_json::from_slice(&actix_test::read_body(response).await).expect("post payload")
    }

    #[rstest]
    #[case("post", "/create")]
    #[case("post", "/update/1")]
    #[case("get", "/delete/1")]
    #[case("get", "/post/1")]
    #[actix_web::test]
    async fn post_routes_reject_missing_sessions_with_401(
        #[case] method: &str,
        #[case] uri: &str,
    ) {
        let app = actix_test::init_service(test_app()).await;
        let request = match method {
            "post" => actix_test::TestRequest::post()
                .uri(uri)
                .set_form([("title", "T"), ("body", "B")])
                .to_request(),
            _ => actix_test::TestRequest::get().uri(uri).to_request(),
        };

        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let value: Value =
            serde_json::from_slice(&actix_test::read_body(response).await).expect("error payload");
        assert_eq!(
            value.get("code").and_then(Value::as_str),
            Some("unauthorized")
        );
    }

    #[rstest]
    #[case(&[("body", "B")], "title", "empty_title")]
    #[case(&[("title", "T")], "body", "empty_body")]
    #[case(&[("title", "   "), ("body", "B")], "title", "empty_title")]
    #[actix_web::test]
    async fn create_rejects_blank_content(
        #[case] form: &[(&str, &str)],
        #[case] field: &str,
        #[case] detail_code: &str,
    ) {
        let app = actix_test::init_service(test_app()).await;
        let cookie = sign_in(&app, "alice", "pw1").await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/create")
                .cookie(cookie)
                .set_form(form)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let value: Value =
            serde_json::from_slice(&actix_test::read_body(response).await).expect("error payload");
        assert_eq!(
            value.pointer("/details/field").and_then(Value::as_str),
            Some(field)
        );
        assert_eq!(
            value.pointer("/details/code").and_then(Value::as_str),
            Some(detail_code)
        );
    }

    #[actix_web::test]
    async fn author_can_create_update_and_delete_a_post() {
        let app = actix_test::init_service(test_app()).await;
        let cookie = sign_in(&app, "alice", "pw1").await;

        let created = create(&app, &cookie, "T", "B").await;
        assert_eq!(created.get("title"), Some(&Value::String("T".into())));
        assert_eq!(
            created.get("authorUsername"),
            Some(&Value::String("alice".into()))
        );
        let post_id = created.get("id").and_then(Value::as_i64).expect("post id");

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!("/update/{post_id}"))
                .cookie(cookie.clone())
                .set_form([("title", "T2"), ("body", "B2")])
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/post/{post_id}"))
                .cookie(cookie.clone())
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let fetched: Value =
            serde_json::from_slice(&actix_test::read_body(response).await).expect("post payload");
        assert_eq!(fetched.get("title"), Some(&Value::String("T2".into())));
        assert_eq!(fetched.get("body"), Some(&Value::String("B2".into())));

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/delete/{post_id}"))
                .cookie(cookie.clone())
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/post/{post_id}"))
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn non_owner_mutations_are_forbidden_and_leave_the_post_intact() {
        let app = actix_test::init_service(test_app()).await;
        let alice = sign_in(&app, "alice", "pw1").await;
        let bob = sign_in(&app, "bob", "pw2").await;

        let created = create(&app, &alice, "T", "B").await;
        let post_id = created.get("id").and_then(Value::as_i64).expect("post id");

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!("/update/{post_id}"))
                .cookie(bob.clone())
                .set_form([("title", "T2"), ("body", "B2")])
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/delete/{post_id}"))
                .cookie(bob.clone())
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        // Bob can still read it, and it is unchanged.
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/post/{post_id}"))
                .cookie(bob)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let fetched: Value =
            serde_json::from_slice(&actix_test::read_body(response).await).expect("post payload");
        assert_eq!(fetched.get("title"), Some(&Value::String("T".into())));
    }

    #[actix_web::test]
    async fn update_of_a_missing_post_is_not_found() {
        let app = actix_test::init_service(test_app()).await;
        let cookie = sign_in(&app, "alice", "pw1").await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/update/404")
                .cookie(cookie)
                .set_form([("title", "T2"), ("body", "B2")])
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
