//! One adapter per sink. The dispatcher only sees the [`Transport`] trait.
//!
//! Adapters never decide about fallback themselves: a synchronous failure is returned as
//! [`TransportError`], an asynchronous one trips the shared [`Fallback`].

mod console;
mod discord;
mod file;
mod http;
mod slack;
mod socket;

pub use console::ConsoleTransport;
pub use discord::DiscordTransport;
pub use file::{FileEntry, FileTransport};
pub use http::{BodyBuilder, BodyContext, HttpTransport};
pub use slack::SlackTransport;
pub use socket::SocketTransport;

use crate::config::{Project, TransportKind};
use crate::fmt::{Args, render_values};
use crate::internal::Diagnostics;
use crate::level::Severity;
use crate::net::{HttpError, SocketError};
use chrono::{DateTime, Local};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Whether a record came from a log call or an alert call; HTTP bodies differ between the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Log,
    Alert,
}

/// Everything an adapter needs to render one message.
#[derive(Debug, Clone)]
pub struct Record {
    pub level: Severity,
    pub kind: RecordKind,
    pub args: Args,
    /// Chat channel name requested by an alert call.
    pub channel: Option<String>,
    /// Alert attachments/embeds, appended after the generated metadata block.
    pub extra: Vec<Value>,
    pub timestamp: DateTime<Local>,
}

impl Record {
    #[must_use]
    pub fn log(level: Severity, args: Args) -> Self {
        Self {
            level,
            kind: RecordKind::Log,
            args,
            channel: None,
            extra: Vec::new(),
            timestamp: Local::now(),
        }
    }

    #[must_use]
    pub fn alert(
        level: Severity,
        message: &str,
        channel: Option<&str>,
        extra: Option<Vec<Value>>,
    ) -> Self {
        Self {
            level,
            kind: RecordKind::Alert,
            args: Args::from(message),
            channel: channel.map(ToString::to_string),
            extra: extra.unwrap_or_default(),
            timestamp: Local::now(),
        }
    }

    /// The arguments alone, rendered as one line.
    #[must_use]
    pub fn message(&self) -> String {
        self.args.render()
    }

    /// Message followed by any extras, for sinks without a separate attachment slot.
    #[must_use]
    pub fn text(&self) -> String {
        if self.extra.is_empty() {
            return self.message();
        }
        format!("{} {}", self.message(), render_values(&self.extra))
    }

    /// Arguments then extras, as JSON values.
    #[must_use]
    pub fn values(&self) -> Vec<Value> {
        self.args
            .values()
            .iter()
            .chain(self.extra.iter())
            .cloned()
            .collect()
    }
}

/// `Send + Sync` so a dispatcher can be shared across threads behind a `&'static`.
pub trait Transport: Send + Sync {
    fn kind(&self) -> TransportKind;

    /// # Errors
    /// Any failure that should demote the dispatcher to the console transport.
    fn send(&self, record: &Record) -> Result<(), TransportError>;
}

#[derive(Debug)]
pub enum TransportError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Http(HttpError),
    Socket(SocketError),
    Format(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Json(e) => write!(f, "JSON error: {e}"),
            Self::Http(e) => write!(f, "HTTP error: {e}"),
            Self::Socket(e) => write!(f, "socket error: {e}"),
            Self::Format(s) => write!(f, "format error: {s}"),
        }
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Http(e) => Some(e),
            Self::Socket(e) => Some(e),
            Self::Format(_) => None,
        }
    }
}

impl From<std::io::Error> for TransportError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl From<HttpError> for TransportError {
    fn from(e: HttpError) -> Self {
        Self::Http(e)
    }
}

impl From<SocketError> for TransportError {
    fn from(e: SocketError) -> Self {
        Self::Socket(e)
    }
}

/// Shared demotion flag. Once tripped, the dispatcher routes every later record to the console.
#[derive(Debug, Clone)]
pub struct Fallback {
    tripped: Arc<AtomicBool>,
    diagnostics: Diagnostics,
}

impl Fallback {
    #[must_use]
    pub fn new(diagnostics: Diagnostics) -> Self {
        Self {
            tripped: Arc::new(AtomicBool::new(false)),
            diagnostics,
        }
    }

    /// Demotes to console. Only the first trip is reported.
    pub fn trip(&self, reason: &str) {
        if !self.tripped.swap(true, Ordering::AcqRel) {
            self.diagnostics.error("TRANSPORT", reason);
            self.diagnostics
                .warn("TRANSPORT", "Reverting to console transport");
        }
    }

    #[must_use]
    pub fn is_tripped(&self) -> bool {
        self.tripped.load(Ordering::Acquire)
    }
}

/// Looks up the webhook for an alert: the requested channel, else the configured default.
///
/// # Errors
/// Returns the warning to emit when no webhook can be resolved.
pub(crate) fn resolve_channel<'a>(
    platform: &str,
    channels: &'a BTreeMap<String, String>,
    default_channel: Option<&str>,
    requested: Option<&str>,
) -> Result<&'a str, String> {
    let Some(name) = requested.or(default_channel) else {
        return Err(format!(
            "No channel given and no default {platform} channel configured"
        ));
    };
    channels
        .get(name)
        .map(String::as_str)
        .ok_or_else(|| format!("Channel {name} is not defined in {platform} config"))
}

/// `{name, version}` object used by the HTTP and socket payloads.
pub(crate) fn project_json(project: &Project) -> Value {
    json!({
        "name": project.name,
        "version": project.version,
    })
}
