use utoipa::OpenApi;

use super::handlers::{self, health::Health, login::LoginForm};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::root::root,
        handlers::login::login_form,
        handlers::login::login,
        handlers::logout::logout,
        handlers::health::health,
    ),
    components(schemas(Health, LoginForm)),
    tags(
        (name = "auth", description = "Admin login and logout"),
        (name = "health", description = "Service health"),
        (name = "root", description = "Landing page"),
    )
)]
struct ApiDoc;

/// OpenAPI document for every route served by [`super::router`].
#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
