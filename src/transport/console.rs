//! Console transport and the target of every revert-to-console.

use super::{Record, Transport, TransportError};
use crate::config::{Project, TransportKind};
use crate::console::Console;
use crate::fmt::colorize_level;
use std::sync::Arc;

/// Writes `[name:version | YYYY-MM-DD HH:MM | LEVEL] message` through the injected console.
#[derive(Clone)]
pub struct ConsoleTransport {
    console: Arc<dyn Console>,
    project: Project,
    colors: bool,
}

impl std::fmt::Debug for ConsoleTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleTransport")
            .field("project", &self.project)
            .field("colors", &self.colors)
            .finish_non_exhaustive()
    }
}

impl ConsoleTransport {
    #[must_use]
    pub fn new(console: Arc<dyn Console>, project: Project) -> Self {
        Self {
            console,
            project,
            colors: true,
        }
    }

    /// Piped output and CI logs can't render ANSI escape codes.
    #[must_use]
    pub const fn colors(mut self, enabled: bool) -> Self {
        self.colors = enabled;
        self
    }

    #[must_use]
    pub fn format_record(&self, record: &Record) -> String {
        let prefix = format!(
            "[{}:{} | {} | {}]",
            self.project.name,
            self.project.version,
            record.timestamp.format("%Y-%m-%d %H:%M"),
            record.level.label()
        );
        let prefix = if self.colors {
            colorize_level(&prefix, record.level)
        } else {
            prefix
        };

        let text = record.text();
        if text.is_empty() {
            prefix
        } else {
            format!("{prefix} {text}")
        }
    }
}

impl Transport for ConsoleTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Console
    }

    fn send(&self, record: &Record) -> Result<(), TransportError> {
        self.console
            .write_line(record.level, &self.format_record(record));
        Ok(())
    }
}
