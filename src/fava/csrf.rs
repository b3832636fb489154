//! Double-submit CSRF protection for the login form.
//!
//! Rendering the form issues a random token twice: once in the `fava_csrf`
//! cookie and once in a hidden form field. A submission is only considered when
//! both copies are present and equal.

use anyhow::{anyhow, Result};
use axum::http::{HeaderMap, HeaderValue};
use subtle::ConstantTimeEq;

use super::{
    state::AuthConfig,
    utils::{cookie_value, generate_token},
};

pub(super) const CSRF_COOKIE_NAME: &str = "fava_csrf";

/// A fresh token plus the `Set-Cookie` value carrying it.
pub(super) fn issue(config: &AuthConfig) -> Result<(String, HeaderValue)> {
    let token = generate_token()?;
    let mut cookie =
        format!("{CSRF_COOKIE_NAME}={token}; Path=/login; HttpOnly; SameSite=Strict");
    if config.cookie_secure() {
        cookie.push_str("; Secure");
    }
    let cookie =
        HeaderValue::from_str(&cookie).map_err(|err| anyhow!("invalid CSRF cookie: {err}"))?;
    Ok((token, cookie))
}

pub(super) fn verify(headers: &HeaderMap, submitted: &str) -> bool {
    let Some(expected) = cookie_value(headers, CSRF_COOKIE_NAME) else {
        return false;
    };
    if submitted.is_empty() {
        return false;
    }
    expected.as_bytes().ct_eq(submitted.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::COOKIE;

    fn headers_with_cookie(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!("{CSRF_COOKIE_NAME}={token}")).unwrap(),
        );
        headers
    }

    #[test]
    fn issue_sets_scoped_cookie() {
        let (token, cookie) = issue(&AuthConfig::new()).unwrap();
        let cookie = cookie.to_str().unwrap();
        assert!(cookie.starts_with(&format!("fava_csrf={token};")));
        assert!(cookie.contains("Path=/login"));
        assert!(cookie.contains("SameSite=Strict"));
        assert!(!cookie.contains("Secure"));
    }

    #[test]
    fn verify_accepts_matching_token() {
        let (token, _) = issue(&AuthConfig::new()).unwrap();
        assert!(verify(&headers_with_cookie(&token), &token));
    }

    #[test]
    fn verify_rejects_mismatch() {
        let (token, _) = issue(&AuthConfig::new()).unwrap();
        assert!(!verify(&headers_with_cookie(&token), "forged"));
    }

    #[test]
    fn verify_rejects_missing_cookie_or_field() {
        let (token, _) = issue(&AuthConfig::new()).unwrap();
        assert!(!verify(&HeaderMap::new(), &token));
        assert!(!verify(&headers_with_cookie(&token), ""));
    }
}
