//! Severity levels that gate which messages reach the active transport.

mod filter;

pub use filter::{LevelFilter, should_emit};

use std::fmt;
use std::str::FromStr;

/// Derives `Ord` so the dispatcher can compare a message's severity against the configured minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Severity {
    /// Plain output with no particular weight; the lowest severity, never filtered by default.
    #[default]
    Log = 0,
    /// Normal operational milestones.
    Info = 1,
    /// Completed operations worth calling out (deploy finished, job succeeded).
    Success = 2,
    /// Non-fatal anomalies that may need attention.
    Warn = 3,
    /// Failures that prevented an operation from completing.
    Error = 4,
}

impl Severity {
    /// Lowercase because config files and CLI args use lowercase level strings.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Log => "log",
            Self::Info => "info",
            Self::Success => "success",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Uppercase label used in console prefixes, file lines and socket payloads.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Log => "LOG",
            Self::Info => "INFO",
            Self::Success => "SUCCESS",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }

    /// Integer weight used by [`LevelFilter`].
    #[must_use]
    pub const fn weight(self) -> u8 {
        self as u8
    }

    /// Inverse of [`Severity::weight`]; out-of-range weights clamp to the nearest bound.
    #[must_use]
    pub const fn from_weight(weight: u8) -> Self {
        match weight {
            0 => Self::Log,
            1 => Self::Info,
            2 => Self::Success,
            3 => Self::Warn,
            _ => Self::Error,
        }
    }

    /// Used by help output, CLI value parsing and tests.
    #[must_use]
    pub const fn all() -> [Self; 5] {
        [
            Self::Log,
            Self::Info,
            Self::Success,
            Self::Warn,
            Self::Error,
        ]
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned by `FromStr` so callers can distinguish "unknown level" from other parse failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSeverityError(String);

impl fmt::Display for ParseSeverityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown log level: '{}'", self.0)
    }
}

impl std::error::Error for ParseSeverityError {}

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "log" => Ok(Self::Log),
            "info" => Ok(Self::Info),
            "success" => Ok(Self::Success),
            "warn" | "warning" => Ok(Self::Warn),
            "error" | "err" => Ok(Self::Error),
            _ => Err(ParseSeverityError(s.to_string())),
        }
    }
}

impl From<log::Level> for Severity {
    /// The `log` crate has no `success`; `debug` and `trace` collapse onto the lowest level.
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Self::Error,
            log::Level::Warn => Self::Warn,
            log::Level::Info => Self::Info,
            log::Level::Debug | log::Level::Trace => Self::Log,
        }
    }
}

impl From<Severity> for log::LevelFilter {
    /// The most verbose `log` level that can still pass a base level of `severity`.
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Log => Self::Trace,
            Severity::Info | Severity::Success => Self::Info,
            Severity::Warn => Self::Warn,
            Severity::Error => Self::Error,
        }
    }
}
