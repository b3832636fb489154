use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap},
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tracing::{error, info};

use crate::fava::{
    session::{authenticate_session, clear_session_cookie},
    AuthState,
};

/// Where anonymous callers of a login-required route are sent.
pub const LOGIN_REQUIRED_REDIRECT: &str = "/login?next=%2Flogout";

#[utoipa::path(
    get,
    path = "/logout",
    responses(
        (status = 303, description = "Session cleared, redirect to `/`, or no session and redirect to `/login`")
    ),
    tag = "auth"
)]
pub async fn logout(headers: HeaderMap, auth_state: Extension<Arc<AuthState>>) -> Response {
    let Some(session) = authenticate_session(&headers, &auth_state).await else {
        return Redirect::to(LOGIN_REQUIRED_REDIRECT).into_response();
    };

    auth_state.sessions().delete(&session.token).await;
    info!("Logout");

    let mut response_headers = HeaderMap::new();
    match clear_session_cookie(auth_state.config()) {
        Ok(cookie) => {
            response_headers.insert(SET_COOKIE, cookie);
        }
        Err(err) => error!("Failed to build session cookie: {err}"),
    }

    (response_headers, Redirect::to("/")).into_response()
}
