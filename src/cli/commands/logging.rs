//! `-v` / `FAVA_LOG_LEVEL`: how chatty the login gate is.
//!
//! Each `-v` raises the level one step from the `error` floor. The env var
//! takes either a level name or the equivalent step count.

use clap::{builder::ValueParser, Arg, ArgAction, ArgMatches, Command};
use tracing::Level;

pub const ARG_VERBOSITY: &str = "verbosity";

/// Level names in step order; the index is the `-v` count.
const LEVEL_NAMES: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

fn parse_level(raw: &str) -> Result<u8, String> {
    let raw = raw.trim();
    if let Ok(steps) = raw.parse::<u8>() {
        if usize::from(steps) < LEVEL_NAMES.len() {
            return Ok(steps);
        }
        return Err(format!("log level must be 0-{}", LEVEL_NAMES.len() - 1));
    }

    LEVEL_NAMES
        .iter()
        .position(|name| name.eq_ignore_ascii_case(raw))
        .and_then(|steps| u8::try_from(steps).ok())
        .ok_or_else(|| format!("unknown log level {raw:?}, expected one of {LEVEL_NAMES:?}"))
}

#[must_use]
pub fn validator_log_level() -> ValueParser {
    ValueParser::from(parse_level)
}

/// Tracing level for a step count. `None` means the `error` floor.
#[must_use]
pub const fn level_for(steps: u8) -> Option<Level> {
    match steps {
        0 => None,
        1 => Some(Level::WARN),
        2 => Some(Level::INFO),
        3 => Some(Level::DEBUG),
        _ => Some(Level::TRACE),
    }
}

/// Resolve the requested tracing level from parsed arguments.
#[must_use]
pub fn level(matches: &ArgMatches) -> Option<Level> {
    level_for(matches.get_one::<u8>(ARG_VERBOSITY).copied().unwrap_or(0))
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_VERBOSITY)
            .short('v')
            .long("verbose")
            .help("Raise log verbosity; repeat up to -vvvv (error, warn, info, debug, trace)")
            .env("FAVA_LOG_LEVEL")
            .global(true)
            .action(ArgAction::Count)
            .value_parser(validator_log_level()),
    )
}
