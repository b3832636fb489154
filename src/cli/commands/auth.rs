use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};

pub const ARG_SESSION_TTL_SECONDS: &str = "session-ttl-seconds";
pub const ARG_COOKIE_SECURE: &str = "cookie-secure";
pub const ARG_LOGIN_ATTEMPTS: &str = "login-attempts";
pub const ARG_LOGIN_WINDOW_SECONDS: &str = "login-window-seconds";

#[derive(Debug, Clone)]
pub struct Options {
    pub session_ttl_seconds: u64,
    pub cookie_secure: bool,
    pub login_attempts: u32,
    pub login_window_seconds: u64,
}

impl Options {
    /// Read the session and rate limit settings.
    ///
    /// # Errors
    /// Returns an error if a setting with a default value is missing.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        Ok(Self {
            session_ttl_seconds: matches
                .get_one::<u64>(ARG_SESSION_TTL_SECONDS)
                .copied()
                .context("missing required argument: --session-ttl-seconds")?,
            cookie_secure: matches.get_flag(ARG_COOKIE_SECURE),
            login_attempts: matches
                .get_one::<u32>(ARG_LOGIN_ATTEMPTS)
                .copied()
                .context("missing required argument: --login-attempts")?,
            login_window_seconds: matches
                .get_one::<u64>(ARG_LOGIN_WINDOW_SECONDS)
                .copied()
                .context("missing required argument: --login-window-seconds")?,
        })
    }
}

pub fn with_args(command: Command) -> Command {
    let command = with_session_args(command);
    with_rate_limit_args(command)
}

fn with_session_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_SESSION_TTL_SECONDS)
                .long(ARG_SESSION_TTL_SECONDS)
                .help("Server-side session lifetime in seconds")
                .env("FAVA_SESSION_TTL_SECONDS")
                .default_value("43200")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new(ARG_COOKIE_SECURE)
                .long(ARG_COOKIE_SECURE)
                .help("Mark session and CSRF cookies as Secure (serve over HTTPS)")
                .env("FAVA_COOKIE_SECURE")
                .action(ArgAction::SetTrue),
        )
}

fn with_rate_limit_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_LOGIN_ATTEMPTS)
                .long(ARG_LOGIN_ATTEMPTS)
                .help("Requests to /login allowed per client within the window")
                .env("FAVA_LOGIN_ATTEMPTS")
                .default_value("3")
                .value_parser(clap::value_parser!(u32).range(1..)),
        )
        .arg(
            Arg::new(ARG_LOGIN_WINDOW_SECONDS)
                .long(ARG_LOGIN_WINDOW_SECONDS)
                .help("Length of the /login rate limit window in seconds")
                .env("FAVA_LOGIN_WINDOW_SECONDS")
                .default_value("3600")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
}
