//! Login form handlers.
//!
//! Failed logins re-render the form without any error detail: unknown
//! usernames, wrong passwords and stale CSRF tokens all look the same.

use askama::Template;
use axum::{
    extract::{Extension, Form},
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use std::{fmt, sync::Arc};
use tracing::{debug, error, info};
use utoipa::ToSchema;

use super::render;
use crate::fava::{csrf, session::session_cookie, AuthState};

#[derive(Template)]
#[template(path = "login.html")]
struct LoginTemplate<'a> {
    csrf_token: &'a str,
    username: &'a str,
}

#[derive(ToSchema, Deserialize, Default)]
pub struct LoginForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    csrf_token: String,
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

#[utoipa::path(
    get,
    path = "/login",
    responses(
        (status = 200, description = "Login form", content_type = "text/html"),
        (status = 429, description = "Too many login attempts")
    ),
    tag = "auth"
)]
pub async fn login_form(auth_state: Extension<Arc<AuthState>>) -> Response {
    render_form(&auth_state, "")
}

#[utoipa::path(
    post,
    path = "/login",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Login successful, session cookie set, redirect to `/`"),
        (status = 200, description = "Login failed, form shown again", content_type = "text/html"),
        (status = 429, description = "Too many login attempts")
    ),
    tag = "auth"
)]
pub async fn login(
    headers: HeaderMap,
    auth_state: Extension<Arc<AuthState>>,
    form: Option<Form<LoginForm>>,
) -> Response {
    let Some(Form(form)) = form else {
        debug!("Missing or unreadable login form");
        return render_form(&auth_state, "");
    };

    if !csrf::verify(&headers, &form.csrf_token) {
        debug!("CSRF token missing or mismatched");
        return render_form(&auth_state, &form.username);
    }

    let Some(user) = auth_state.users().authenticate(&form.username, &form.password) else {
        info!("Login failed");
        return render_form(&auth_state, &form.username);
    };

    let token = match auth_state.sessions().create(user.id()).await {
        Ok(token) => token,
        Err(err) => {
            error!("Failed to create session: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    match session_cookie(auth_state.config(), &token) {
        Ok(cookie) => {
            info!("Login succeeded");
            ([(SET_COOKIE, cookie)], Redirect::to("/")).into_response()
        }
        Err(err) => {
            error!("Failed to build session cookie: {err}");
            auth_state.sessions().delete(&token).await;
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Render the form with a fresh CSRF token and cookie.
fn render_form(auth_state: &AuthState, username: &str) -> Response {
    let (csrf_token, cookie) = match csrf::issue(auth_state.config()) {
        Ok(issued) => issued,
        Err(err) => {
            error!("Failed to issue CSRF token: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let page = render(&LoginTemplate {
        csrf_token: &csrf_token,
        username,
    });

    ([(SET_COOKIE, cookie)], page).into_response()
}
