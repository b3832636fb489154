//! Auth state and configuration.

use std::sync::Arc;
use std::time::Duration;

use super::{rate_limit::RateLimiter, session::SessionStore, user::UserDirectory};
use crate::secrets::Secrets;

const DEFAULT_SESSION_TTL_SECONDS: u64 = 12 * 60 * 60;
const DEFAULT_LOGIN_ATTEMPTS: u32 = 3;
const DEFAULT_LOGIN_WINDOW_SECONDS: u64 = 60 * 60;

#[derive(Clone, Debug)]
pub struct AuthConfig {
    session_ttl_seconds: u64,
    cookie_secure: bool,
    login_attempts: u32,
    login_window_seconds: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthConfig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
            cookie_secure: false,
            login_attempts: DEFAULT_LOGIN_ATTEMPTS,
            login_window_seconds: DEFAULT_LOGIN_WINDOW_SECONDS,
        }
    }

    #[must_use]
    pub fn with_session_ttl_seconds(mut self, seconds: u64) -> Self {
        self.session_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_cookie_secure(mut self, secure: bool) -> Self {
        self.cookie_secure = secure;
        self
    }

    #[must_use]
    pub fn with_login_attempts(mut self, attempts: u32) -> Self {
        self.login_attempts = attempts;
        self
    }

    #[must_use]
    pub fn with_login_window_seconds(mut self, seconds: u64) -> Self {
        self.login_window_seconds = seconds;
        self
    }

    #[must_use]
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_seconds)
    }

    #[must_use]
    pub fn login_attempts(&self) -> u32 {
        self.login_attempts
    }

    #[must_use]
    pub fn login_window(&self) -> Duration {
        Duration::from_secs(self.login_window_seconds)
    }

    pub(super) fn cookie_secure(&self) -> bool {
        self.cookie_secure
    }
}

/// Everything the handlers share: settings, the user directory, live sessions
/// and the login rate limiter.
pub struct AuthState {
    config: AuthConfig,
    users: UserDirectory,
    sessions: SessionStore,
    rate_limiter: Arc<dyn RateLimiter>,
}

impl AuthState {
    #[must_use]
    pub fn new(
        config: AuthConfig,
        secrets: &Secrets,
        rate_limiter: Arc<dyn RateLimiter>,
    ) -> Self {
        let sessions = SessionStore::new(config.session_ttl());
        Self {
            config,
            users: UserDirectory::from_secrets(secrets),
            sessions,
            rate_limiter,
        }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    #[must_use]
    pub fn users(&self) -> &UserDirectory {
        &self.users
    }

    #[must_use]
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub(super) fn rate_limiter(&self) -> &dyn RateLimiter {
        self.rate_limiter.as_ref()
    }
}
