use crate::fava::{self, rate_limit::FixedWindowRateLimiter, AuthConfig, AuthState};
use crate::secrets::Secrets;
use anyhow::{Context, Result};
use std::{path::PathBuf, sync::Arc};
use tracing::{debug, info};

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub secrets_file: PathBuf,
    pub session_ttl_seconds: u64,
    pub cookie_secure: bool,
    pub login_attempts: u32,
    pub login_window_seconds: u64,
}

/// Build the auth state from the secrets file and settings.
///
/// # Errors
/// Returns an error if the secrets file is missing or malformed.
pub fn auth_state(args: &Args) -> Result<Arc<AuthState>> {
    let secrets = Secrets::load(&args.secrets_file).with_context(|| {
        format!(
            "Could not load secrets from {}",
            args.secrets_file.display()
        )
    })?;

    debug!("Secrets: {:?}", secrets);

    let config = AuthConfig::new()
        .with_session_ttl_seconds(args.session_ttl_seconds)
        .with_cookie_secure(args.cookie_secure)
        .with_login_attempts(args.login_attempts)
        .with_login_window_seconds(args.login_window_seconds);

    let rate_limiter = Arc::new(FixedWindowRateLimiter::new(
        config.login_attempts(),
        config.login_window(),
    ));

    Ok(Arc::new(AuthState::new(config, &secrets, rate_limiter)))
}

/// Execute the server action.
/// # Errors
/// Returns an error if the secrets file cannot be loaded or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let auth_state = auth_state(&args)?;

    info!(
        secrets_file = %args.secrets_file.display(),
        "Loaded admin credentials"
    );

    fava::new(args.port, auth_state).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fava::user::credential_digest;
    use std::io::Write;

    fn args(secrets_file: PathBuf) -> Args {
        Args {
            port: 0,
            secrets_file,
            session_ttl_seconds: 60,
            cookie_secure: false,
            login_attempts: 3,
            login_window_seconds: 3600,
        }
    }

    #[test]
    fn auth_state_loads_secrets_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"secret": "s3cret", "users": ["{}", "{}"]}}"#,
            credential_digest("s3cret", "admin"),
            credential_digest("s3cret", "hunter2"),
        )
        .unwrap();

        let state = auth_state(&args(file.path().to_path_buf())).unwrap();
        assert!(state.users().authenticate("admin", "hunter2").is_some());
        assert_eq!(state.config().login_attempts(), 3);
    }

    #[test]
    fn auth_state_fails_without_secrets_file() {
        let dir = tempfile::tempdir().unwrap();
        let Err(err) = auth_state(&args(dir.path().join("missing.json"))) else {
            panic!("expected missing secrets file to fail");
        };
        assert!(err.to_string().contains("Could not load secrets"));
    }

    #[test]
    fn auth_state_fails_on_malformed_secrets() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"secret": "s3cret", "users": ["only-one"]}}"#).unwrap();

        assert!(auth_state(&args(file.path().to_path_buf())).is_err());
    }
}
