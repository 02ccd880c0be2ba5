//! The process console as an injectable capability.
//!
//! The console transport and the crate's own diagnostics both write through a [`Console`].
//! Hosts hand in their own implementation instead of having a global print function patched.

use crate::level::Severity;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

/// A line-oriented sink. Implementations must not fail loudly: the console is the last resort.
pub trait Console: Send + Sync {
    fn write_line(&self, level: Severity, line: &str);
}

/// Writes warn and error lines to stderr, everything else to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdConsole;

impl Console for StdConsole {
    fn write_line(&self, level: Severity, line: &str) {
        // Broken pipes on stdout/stderr have nowhere left to be reported.
        if level >= Severity::Warn {
            let _ = writeln!(io::stderr(), "{line}");
        } else {
            let _ = writeln!(io::stdout(), "{line}");
        }
    }
}

/// Keeps every line in memory. Useful for embedding hosts that render output themselves and for tests.
#[derive(Debug, Clone, Default)]
pub struct CaptureConsole {
    lines: Arc<Mutex<Vec<(Severity, String)>>>,
}

impl CaptureConsole {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything written so far.
    #[must_use]
    pub fn lines(&self) -> Vec<(Severity, String)> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Lines written at exactly `level`.
    #[must_use]
    pub fn lines_at(&self, level: Severity) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, line)| line)
            .collect()
    }

    /// `true` if any captured line contains `needle`.
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|(_, line)| line.contains(needle))
    }

    pub fn clear(&self) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Console for CaptureConsole {
    fn write_line(&self, level: Severity, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((level, line.to_string()));
    }
}
