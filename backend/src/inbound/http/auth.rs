//! Authentication handlers: register, login, logout.
//!
//! ```text
//! POST /auth/register  username=alice&password=pw1
//! POST /auth/login     username=alice&password=pw1
//! GET  /auth/logout
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;
use serde_json::json;

use crate::domain::{Credentials, CredentialsValidationError, Error, ErrorCode, User, UserValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Form payload for `POST /auth/register` and `POST /auth/login`.
///
/// Fields are optional so missing parameters surface as domain validation
/// errors rather than framework-level deserialisation failures.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CredentialsForm {
    /// Login name, required and non-empty.
    #[serde(default)]
    pub username: Option<String>,
    /// Password, required and non-empty.
    #[serde(default)]
    pub password: Option<String>,
}

impl CredentialsForm {
    fn into_credentials(self) -> Result<Credentials, CredentialsValidationError> {
        Credentials::try_from_parts(
            self.username.as_deref().unwrap_or(""),
            self.password.as_deref().unwrap_or(""),
        )
    }
}

fn map_credentials_validation_error(err: CredentialsValidationError) -> Error {
    match err {
        CredentialsValidationError::Username(UserValidationError::EmptyUsername) => {
            Error::invalid_request("username must not be empty")
                .with_details(json!({ "field": "username", "code": "empty_username" }))
        }
        CredentialsValidationError::Username(UserValidationError::UsernameTooLong { max }) => {
            Error::invalid_request(format!("username must be at most {max} characters"))
                .with_details(json!({ "field": "username", "code": "username_too_long" }))
        }
        CredentialsValidationError::EmptyPassword => {
            Error::invalid_request("password must not be empty")
                .with_details(json!({ "field": "password", "code": "empty_password" }))
        }
    }
}

/// Collapse credential-store failures into one response so login never
/// reveals whether the username exists.
fn obscure_login_failure(err: Error) -> Error {
    match err.code() {
        ErrorCode::NotFound | ErrorCode::Unauthorized => {
            Error::unauthorized("invalid credentials")
        }
        _ => err,
    }
}

/// Register a new user.
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body(content = CredentialsForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "User created", body = User),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Username already registered", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    form: web::Form<CredentialsForm>,
) -> ApiResult<web::Json<User>> {
    let credentials = form
        .into_inner()
        .into_credentials()
        .map_err(map_credentials_validation_error)?;
    let user = state.credentials.register(&credentials).await?;
    Ok(web::Json(user))
}

/// Authenticate a user and establish a session.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body(content = CredentialsForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Login success", headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    session: SessionContext,
    state: web::Data<HttpState>,
    form: web::Form<CredentialsForm>,
) -> ApiResult<HttpResponse> {
    let credentials = form
        .into_inner()
        .into_credentials()
        .map_err(map_credentials_validation_error)?;
    let user_id = state
        .credentials
        .verify(&credentials)
        .await
        .map_err(obscure_login_failure)?;
    session.log_in(user_id)?;
    Ok(HttpResponse::Ok().json(json!({ "message": "login success" })))
}

/// End the current session. Safe to call without one.
#[utoipa::path(
    get,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Session cleared"),
    ),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[get("/auth/logout")]
pub async fn logout(session: SessionContext) -> ApiResult<HttpResponse> {
    session.log_out();
    Ok(HttpResponse::Ok().json(json!({ "message": "logged out" })))
}
