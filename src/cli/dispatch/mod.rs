//! Command-line argument dispatch.
//!
//! Maps validated CLI matches to an action: serving the login gate, or
//! printing a credential digest for the secrets file.

use crate::cli::actions::{hash, server, Action};
use crate::cli::commands::{
    auth, ARG_HASH_SECRET, ARG_HASH_VALUE, ARG_PORT, ARG_SECRETS_FILE, CMD_HASH,
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::path::PathBuf;

/// Map validated CLI matches to an action.
///
/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    if let Some(sub_m) = matches.subcommand_matches(CMD_HASH) {
        let secret = sub_m
            .get_one::<String>(ARG_HASH_SECRET)
            .cloned()
            .context("missing required argument: --secret")?;
        let value = sub_m
            .get_one::<String>(ARG_HASH_VALUE)
            .cloned()
            .context("missing required argument: <VALUE>")?;

        return Ok(Action::Hash(hash::Args {
            secret: SecretString::from(secret),
            value: SecretString::from(value),
        }));
    }

    let port = matches
        .get_one::<u16>(ARG_PORT)
        .copied()
        .context("missing required argument: --port")?;
    let secrets_file = matches
        .get_one::<String>(ARG_SECRETS_FILE)
        .map(PathBuf::from)
        .context("missing required argument: --secrets-file")?;

    let auth_opts = auth::Options::parse(matches)?;

    Ok(Action::Server(server::Args {
        port,
        secrets_file,
        session_ttl_seconds: auth_opts.session_ttl_seconds,
        cookie_secure: auth_opts.cookie_secure,
        login_attempts: auth_opts.login_attempts,
        login_window_seconds: auth_opts.login_window_seconds,
    }))
}
