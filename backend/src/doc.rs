//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct generating the OpenAPI specification for
//! the REST API: all HTTP endpoints from the inbound layer, the shared
//! error envelope and domain schemas, and the session cookie security
//! scheme. Swagger UI serves the document in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode, Post, User};
use crate::inbound::http::auth::CredentialsForm;
use crate::inbound::http::posts::PostForm;

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /auth/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Blog backend API",
        description = "HTTP interface for session-authenticated blog post management."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::posts::create_post,
        crate::inbound::http::posts::get_post,
        crate::inbound::http::posts::update_post,
        crate::inbound::http::posts::delete_post,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(User, Post, Error, ErrorCode, CredentialsForm, PostForm)),
    tags(
        (name = "auth", description = "Registration, login, and logout"),
        (name = "posts", description = "Author-scoped post management"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the generated document covers the HTTP surface.
    use utoipa::OpenApi;

    use super::*;

    #[test]
    fn openapi_document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/auth/register",
            "/auth/login",
            "/auth/logout",
            "/create",
            "/post/{id}",
            "/update/{id}",
            "/delete/{id}",
            "/health/ready",
            "/health/live",
        ] {
            assert!(
                doc.paths.paths.contains_key(path),
                "OpenAPI document should describe {path}"
            );
        }
    }

    #[test]
    fn openapi_document_registers_the_error_schema() {
        let doc = ApiDoc::openapi();
        let components = doc.components.as_ref().expect("components present");
        assert!(components.schemas.contains_key("Error"));
        assert!(components.schemas.contains_key("Post"));
        assert!(components.schemas.contains_key("User"));
    }
}
