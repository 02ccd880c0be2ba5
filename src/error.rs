//! Error type for the command-line front end.

use crate::config::ConfigError;

/// Error type for relaylog operations outside the log hot path.
#[derive(Debug)]
pub enum Error {
    /// Config could not be loaded or verified.
    Config(ConfigError),
    /// Invalid log level string.
    InvalidLevel(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config error: {e}"),
            Self::InvalidLevel(level) => write!(
                f,
                "invalid level: {level} (expected log, info, success, warn or error)"
            ),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::InvalidLevel(_) => None,
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}
