pub mod health;
pub use self::health::health;

pub mod login;
pub use self::login::{login, login_form};

pub mod logout;
pub use self::logout::logout;

pub mod root;
pub use self::root::root;

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tracing::error;

/// Render a template into an HTML response, answering `500` if rendering fails.
fn render<T: Template>(template: &T) -> Response {
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(err) => {
            error!("Failed to render template: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
