//! relaylog's own diagnostic channel.
//!
//! Verification warnings, revert notices and connection events are written to the same
//! console the host injected, so they stay visible even when the configured transport is
//! remote or broken. Lines are tagged `[relaylog]` and colored by severity.

use crate::console::{Console, StdConsole};
use crate::fmt::colorize_level;
use crate::level::Severity;
use std::sync::Arc;

/// Cheap to clone; every adapter that can fail asynchronously keeps one.
#[derive(Clone)]
pub struct Diagnostics {
    console: Arc<dyn Console>,
    colors: bool,
}

impl std::fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Diagnostics")
            .field("colors", &self.colors)
            .finish_non_exhaustive()
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new(Arc::new(StdConsole))
    }
}

impl Diagnostics {
    #[must_use]
    pub fn new(console: Arc<dyn Console>) -> Self {
        Self {
            console,
            colors: true,
        }
    }

    /// Plain text for sinks that are not terminals.
    #[must_use]
    pub const fn colors(mut self, enabled: bool) -> Self {
        self.colors = enabled;
        self
    }

    fn emit(&self, level: Severity, scope: &str, msg: &str) {
        let line = format!("[relaylog] {scope} {msg}");
        if self.colors {
            self.console
                .write_line(level, &colorize_level(&line, level));
        } else {
            self.console.write_line(level, &line);
        }
    }

    pub fn info(&self, scope: &str, msg: &str) {
        self.emit(Severity::Info, scope, msg);
    }

    pub fn success(&self, scope: &str, msg: &str) {
        self.emit(Severity::Success, scope, msg);
    }

    pub fn warn(&self, scope: &str, msg: &str) {
        self.emit(Severity::Warn, scope, msg);
    }

    pub fn error(&self, scope: &str, msg: &str) {
        self.emit(Severity::Error, scope, msg);
    }
}
