//! Rate limiting for the login route.
//!
//! Fixed window per client address: the first hit opens a window, every hit
//! inside it counts, and once the count passes the limit requests are rejected
//! with `429` until the window closes. Both `GET` and `POST /login` count.

use axum::{
    extract::{ConnectInfo, Extension, Request},
    http::{header::RETRY_AFTER, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};
use tokio::time::Instant;
use tracing::warn;

use super::state::AuthState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed,
    Limited { retry_after: Duration },
}

pub trait RateLimiter: Send + Sync {
    fn check(&self, key: &str) -> RateLimitDecision;
}

#[derive(Clone, Debug)]
pub struct NoopRateLimiter;

impl RateLimiter for NoopRateLimiter {
    fn check(&self, _key: &str) -> RateLimitDecision {
        RateLimitDecision::Allowed
    }
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    hits: u32,
}

#[derive(Debug)]
pub struct FixedWindowRateLimiter {
    limit: u32,
    window: Duration,
    windows: Mutex<HashMap<String, Window>>,
}

impl FixedWindowRateLimiter {
    #[must_use]
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            windows: Mutex::new(HashMap::new()),
        }
    }
}

impl RateLimiter for FixedWindowRateLimiter {
    fn check(&self, key: &str) -> RateLimitDecision {
        let now = Instant::now();
        let mut windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);

        windows.retain(|_, window| now.duration_since(window.started) < self.window);

        let window = windows.entry(key.to_string()).or_insert(Window {
            started: now,
            hits: 0,
        });
        window.hits = window.hits.saturating_add(1);

        if window.hits > self.limit {
            RateLimitDecision::Limited {
                retry_after: self.window.saturating_sub(now.duration_since(window.started)),
            }
        } else {
            RateLimitDecision::Allowed
        }
    }
}

/// Key requests by peer IP. Without connect info all requests share one bucket.
fn client_key(peer: Option<SocketAddr>) -> String {
    peer.map_or_else(|| "unknown".to_string(), |addr| addr.ip().to_string())
}

fn retry_after_seconds(retry_after: Duration) -> u64 {
    retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0)
}

/// Middleware guarding `/login`.
pub(super) async fn limit_login(
    Extension(auth_state): Extension<Arc<AuthState>>,
    peer: Option<ConnectInfo<SocketAddr>>,
    request: Request,
    next: Next,
) -> Response {
    let key = client_key(peer.map(|ConnectInfo(addr)| addr));

    match auth_state.rate_limiter().check(&key) {
        RateLimitDecision::Allowed => next.run(request).await,
        RateLimitDecision::Limited { retry_after } => {
            warn!(client = %key, "Login rate limit exceeded");
            (
                StatusCode::TOO_MANY_REQUESTS,
                [(RETRY_AFTER, retry_after_seconds(retry_after).to_string())],
                "Too Many Requests",
            )
                .into_response()
        }
    }
}
