use askama::Template;
use axum::{extract::Extension, http::HeaderMap, response::Response};
use std::sync::Arc;

use super::render;
use crate::fava::{session::authenticate_session, AuthState};

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    signed_in: bool,
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Landing page showing whether the caller is signed in", content_type = "text/html")
    ),
    tag = "root"
)]
pub async fn root(headers: HeaderMap, auth_state: Extension<Arc<AuthState>>) -> Response {
    let signed_in = authenticate_session(&headers, &auth_state).await.is_some();
    render(&IndexTemplate { signed_in })
}
