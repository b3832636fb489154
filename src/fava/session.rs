//! In-process session store and session cookie handling.
//!
//! Only the SHA-256 of a session token is kept in memory; the raw token lives
//! in the `fava_session` cookie. Sessions expire after the configured TTL and
//! are dropped lazily when looked up or when a new session is created.

use anyhow::Result;
use axum::http::{header::InvalidHeaderValue, HeaderMap, HeaderValue};
use std::collections::HashMap;
use std::time::Duration;
use tokio::{sync::Mutex, time::Instant};
use tracing::debug;

use super::{
    state::{AuthConfig, AuthState},
    utils::{cookie_value, generate_token, hash_token},
};

pub const SESSION_COOKIE_NAME: &str = "fava_session";

#[derive(Debug, Clone)]
struct SessionRecord {
    user_id: String,
    created_at: Instant,
}

#[derive(Debug)]
pub struct SessionStore {
    ttl: Duration,
    sessions: Mutex<HashMap<Vec<u8>, SessionRecord>>,
}

impl SessionStore {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Start a session for `user_id` and return the raw token for the cookie.
    ///
    /// # Errors
    /// Returns an error if the system random source fails.
    pub async fn create(&self, user_id: &str) -> Result<String> {
        let token = generate_token()?;
        let now = Instant::now();

        let mut sessions = self.sessions.lock().await;
        sessions.retain(|_, record| now.duration_since(record.created_at) < self.ttl);
        sessions.insert(
            hash_token(&token),
            SessionRecord {
                user_id: user_id.to_string(),
                created_at: now,
            },
        );

        Ok(token)
    }

    /// Resolve a raw token to its user id, dropping it if expired.
    pub async fn lookup(&self, token: &str) -> Option<String> {
        let key = hash_token(token);
        let mut sessions = self.sessions.lock().await;

        let expired = sessions
            .get(&key)
            .map(|record| record.created_at.elapsed() >= self.ttl)?;
        if expired {
            debug!("Session expired");
            sessions.remove(&key);
            return None;
        }

        sessions.get(&key).map(|record| record.user_id.clone())
    }

    /// Remove a session. Returns `true` if it existed.
    pub async fn delete(&self, token: &str) -> bool {
        self.sessions
            .lock()
            .await
            .remove(&hash_token(token))
            .is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// An authenticated request: the raw session token and the signed-in user.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub user_id: String,
}

/// Resolve the session cookie into an authenticated session, if any.
///
/// Returns `None` when the cookie is missing, unknown, expired, or points at a
/// user that is no longer in the directory.
pub async fn authenticate_session(
    headers: &HeaderMap,
    auth_state: &AuthState,
) -> Option<AuthSession> {
    let token = cookie_value(headers, SESSION_COOKIE_NAME)?;
    let user_id = auth_state.sessions().lookup(&token).await?;
    auth_state.users().get(&user_id)?;
    Some(AuthSession { token, user_id })
}

/// Session cookie without `Max-Age`, so it ends with the browser session.
pub(super) fn session_cookie(
    config: &AuthConfig,
    token: &str,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!("{SESSION_COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite=Lax");
    if config.cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

pub(super) fn clear_session_cookie(
    config: &AuthConfig,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!("{SESSION_COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    if config.cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_then_lookup() {
        let store = SessionStore::new(Duration::from_secs(60));
        let token = store.create("user-1").await.unwrap();

        assert_eq!(store.lookup(&token).await, Some("user-1".to_string()));
        assert_eq!(store.lookup("not-a-token").await, None);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn delete_removes_session() {
        let store = SessionStore::new(Duration::from_secs(60));
        let token = store.create("user-1").await.unwrap();

        assert!(store.delete(&token).await);
        assert!(!store.delete(&token).await);
        assert_eq!(store.lookup(&token).await, None);
        assert!(store.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn sessions_expire_after_ttl() {
        let store = SessionStore::new(Duration::from_secs(60));
        let token = store.create("user-1").await.unwrap();

        tokio::time::advance(Duration::from_secs(59)).await;
        assert!(store.lookup(&token).await.is_some());

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(store.lookup(&token).await.is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn create_prunes_expired_sessions() {
        let store = SessionStore::new(Duration::from_secs(60));
        store.create("user-1").await.unwrap();
        tokio::time::advance(Duration::from_secs(61)).await;

        store.create("user-1").await.unwrap();
        assert_eq!(store.len().await, 1);
    }

    #[test]
    fn session_cookie_attributes() {
        let config = AuthConfig::new();
        let cookie = session_cookie(&config, "tok").unwrap();
        let cookie = cookie.to_str().unwrap();
        assert_eq!(cookie, "fava_session=tok; Path=/; HttpOnly; SameSite=Lax");
        assert!(!cookie.contains("Max-Age"));

        let secure = session_cookie(&config.with_cookie_secure(true), "tok").unwrap();
        assert!(secure.to_str().unwrap().ends_with("; Secure"));
    }

    #[test]
    fn clear_session_cookie_expires_immediately() {
        let cookie = clear_session_cookie(&AuthConfig::new()).unwrap();
        assert!(cookie.to_str().unwrap().contains("Max-Age=0"));
        assert!(cookie.to_str().unwrap().starts_with("fava_session=;"));
    }
}
