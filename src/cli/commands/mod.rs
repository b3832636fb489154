pub mod auth;
pub mod logging;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ColorChoice, Command,
};

use crate::secrets::DEFAULT_SECRETS_PATH;

pub const ARG_PORT: &str = "port";
pub const ARG_SECRETS_FILE: &str = "secrets-file";

pub const CMD_HASH: &str = "hash";
pub const ARG_HASH_SECRET: &str = "secret";
pub const ARG_HASH_VALUE: &str = "value";

fn hash_command() -> Command {
    Command::new(CMD_HASH)
        .about("Print the salted digest of a username or password for the secrets file")
        .arg(
            Arg::new(ARG_HASH_SECRET)
                .long("secret")
                .help("Secret key, the same value as \"secret\" in the secrets file")
                .env("FAVA_SECRET")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new(ARG_HASH_VALUE)
                .help("Plaintext username or password to digest")
                .required(true),
        )
}

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!(
            "{} - {}",
            env!("CARGO_PKG_VERSION"),
            crate::fava::GIT_COMMIT_HASH
        )
        .into_boxed_str(),
    );

    let command = Command::new("fava-auth")
        .about("Single-admin login gate")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new(ARG_PORT)
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("8080")
                .env("FAVA_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new(ARG_SECRETS_FILE)
                .short('s')
                .long("secrets-file")
                .help("Path to the JSON secrets file")
                .long_help(
                    "Path to the JSON secrets file holding \"secret\" and the two-entry \"users\" list (username digest, password digest).",
                )
                .env("FAVA_SECRETS_FILE")
                .default_value(DEFAULT_SECRETS_PATH),
        )
        .subcommand(hash_command());

    let command = auth::with_args(command);
    logging::with_args(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "fava-auth");
        assert_eq!(
            command.get_about().map(ToString::to_string),
            Some("Single-admin login gate".to_string())
        );
        assert_eq!(
            command.get_version().map(ToString::to_string),
            Some(env!("CARGO_PKG_VERSION").to_string())
        );
    }

    #[test]
    fn test_defaults() {
        temp_env::with_vars(
            [
                ("FAVA_PORT", None::<&str>),
                ("FAVA_SECRETS_FILE", None),
                ("FAVA_SESSION_TTL_SECONDS", None),
                ("FAVA_COOKIE_SECURE", None),
                ("FAVA_LOGIN_ATTEMPTS", None),
                ("FAVA_LOGIN_WINDOW_SECONDS", None),
            ],
            || {
                let matches = new().get_matches_from(vec!["fava-auth"]);
                assert_eq!(matches.get_one::<u16>(ARG_PORT).copied(), Some(8080));
                assert_eq!(
                    matches.get_one::<String>(ARG_SECRETS_FILE).cloned(),
                    Some("data/secrets.json".to_string())
                );
                assert_eq!(
                    matches
                        .get_one::<u64>(auth::ARG_SESSION_TTL_SECONDS)
                        .copied(),
                    Some(43_200)
                );
                assert!(!matches.get_flag(auth::ARG_COOKIE_SECURE));
                assert_eq!(
                    matches.get_one::<u32>(auth::ARG_LOGIN_ATTEMPTS).copied(),
                    Some(3)
                );
                assert_eq!(
                    matches
                        .get_one::<u64>(auth::ARG_LOGIN_WINDOW_SECONDS)
                        .copied(),
                    Some(3600)
                );
            },
        );
    }

    #[test]
    fn test_check_port_and_secrets_file() {
        let command = new();
        let matches = command.get_matches_from(vec![
            "fava-auth",
            "--port",
            "5000",
            "--secrets-file",
            "/etc/fava/secrets.json",
            "--cookie-secure",
        ]);

        assert_eq!(matches.get_one::<u16>(ARG_PORT).copied(), Some(5000));
        assert_eq!(
            matches.get_one::<String>(ARG_SECRETS_FILE).cloned(),
            Some("/etc/fava/secrets.json".to_string())
        );
        assert!(matches.get_flag(auth::ARG_COOKIE_SECURE));
    }

    #[test]
    fn test_rejects_zero_login_attempts() {
        let result = new().try_get_matches_from(vec!["fava-auth", "--login-attempts", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("FAVA_PORT", Some("443")),
                ("FAVA_SECRETS_FILE", Some("/run/secrets/fava.json")),
                ("FAVA_LOGIN_ATTEMPTS", Some("5")),
                ("FAVA_LOG_LEVEL", Some("info")),
            ],
            || {
                let command = new();
                let matches = command.get_matches_from(vec!["fava-auth"]);
                assert_eq!(matches.get_one::<u16>(ARG_PORT).copied(), Some(443));
                assert_eq!(
                    matches.get_one::<String>(ARG_SECRETS_FILE).cloned(),
                    Some("/run/secrets/fava.json".to_string())
                );
                assert_eq!(
                    matches.get_one::<u32>(auth::ARG_LOGIN_ATTEMPTS).copied(),
                    Some(5)
                );
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    Some(2)
                );
            },
        );
    }

    #[test]
    fn test_check_log_level_env() {
        // loop cover all possible value_parse
        let levels = vec!["error", "warn", "info", "debug", "trace"];
        for (index, &level) in levels.iter().enumerate() {
            temp_env::with_vars([("FAVA_LOG_LEVEL", Some(level))], || {
                let command = new();
                let matches = command.get_matches_from(vec!["fava-auth"]);
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    u8::try_from(index).ok()
                );
            });
        }
    }

    #[test]
    fn test_check_log_level_verbosity() {
        for index in 0..5_usize {
            temp_env::with_vars([("FAVA_LOG_LEVEL", None::<String>)], || {
                let mut args = vec!["fava-auth".to_string()];

                // Add the appropriate number of "-v" flags based on the index
                if index > 0 {
                    args.push(format!("-{}", "v".repeat(index)));
                }

                let matches = new().get_matches_from(args);

                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    u8::try_from(index).ok()
                );
            });
        }
    }

    #[test]
    fn test_hash_subcommand() {
        temp_env::with_vars([("FAVA_SECRET", None::<&str>)], || {
            let matches =
                new().get_matches_from(vec!["fava-auth", "hash", "--secret", "s3cret", "admin"]);
            let sub = matches.subcommand_matches(CMD_HASH).unwrap();
            assert_eq!(
                sub.get_one::<String>(ARG_HASH_SECRET).cloned(),
                Some("s3cret".to_string())
            );
            assert_eq!(
                sub.get_one::<String>(ARG_HASH_VALUE).cloned(),
                Some("admin".to_string())
            );
        });
    }

    #[test]
    fn test_hash_subcommand_requires_secret() {
        temp_env::with_vars([("FAVA_SECRET", None::<&str>)], || {
            let result = new().try_get_matches_from(vec!["fava-auth", "hash", "admin"]);
            assert!(result.is_err());
        });
    }
}
