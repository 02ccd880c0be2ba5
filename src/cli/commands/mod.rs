//! Each subcommand lives in its own file; `main` only parses and picks one.

mod check;
mod send;

pub use check::cmd_check;
pub use send::cmd_send;

use crate::Error;
use crate::config::RawConfig;
use crate::level::Severity;
use std::path::Path;

/// Reads `path`, or the default config location when none is given.
///
/// # Errors
/// The file cannot be found, read or parsed.
pub fn load_config(path: Option<&Path>) -> Result<RawConfig, Error> {
    let config = match path {
        Some(path) => RawConfig::load_from(path)?,
        None => RawConfig::load()?,
    };
    Ok(config)
}

/// Parses a level argument such as `warn` or `ERROR`.
///
/// # Errors
/// [`Error::InvalidLevel`] for anything that is not a known level.
pub fn parse_level(level: &str) -> Result<Severity, Error> {
    level
        .parse()
        .map_err(|_| Error::InvalidLevel(level.to_string()))
}
