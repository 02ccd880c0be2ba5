//! Configuration after verification: every transport variant here is complete and usable.

use crate::level::Severity;
use crate::net::HttpMethod;
use crate::transport::BodyBuilder;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Which rule set is in force, resolved from the process environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The output sink a dispatcher forwards to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportKind {
    Console,
    File,
    Http,
    SocketIo,
    Stream,
    Slack,
    Discord,
}

impl TransportKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Console => "console",
            Self::File => "file",
            Self::Http => "http",
            Self::SocketIo => "socket_io",
            Self::Stream => "stream",
            Self::Slack => "slack",
            Self::Discord => "discord",
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "console" => Ok(Self::Console),
            "file" => Ok(Self::File),
            "http" => Ok(Self::Http),
            "socket_io" | "socketio" | "socket.io" => Ok(Self::SocketIo),
            "stream" => Ok(Self::Stream),
            "slack" => Ok(Self::Slack),
            "discord" => Ok(Self::Discord),
            _ => Err(s.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileType {
    Json,
    #[default]
    Log,
    Txt,
}

impl FileType {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Log => "log",
            Self::Txt => "txt",
        }
    }
}

impl FromStr for FileType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "log" => Ok(Self::Log),
            "txt" => Ok(Self::Txt),
            _ => Err(s.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FileTransportConfig {
    pub directory: PathBuf,
    pub file_type: FileType,
    /// Already truncated and sanitized; may be empty.
    pub prefix: String,
}

#[derive(Debug, Clone)]
pub struct HealthCheck {
    pub path: String,
    pub method: HttpMethod,
}

#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    pub base_url: String,
    pub headers: BTreeMap<String, String>,
    pub health_check: Option<HealthCheck>,
    pub body_builder: Option<BodyBuilder>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocketEvents {
    pub connection: Option<String>,
    pub disconnect: Option<String>,
    pub log: String,
}

#[derive(Debug, Clone)]
pub struct SocketIoTransportConfig {
    pub base_url: String,
    pub headers: BTreeMap<String, String>,
    pub events: SocketEvents,
}

/// Both Slack config forms end up here: a single webhook becomes a one-entry channel map.
#[derive(Debug, Clone)]
pub struct SlackTransportConfig {
    pub channels: BTreeMap<String, String>,
    pub default_channel: Option<String>,
    pub username: Option<String>,
    /// `:emoji:` or an image URL.
    pub icon: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DiscordTransportConfig {
    /// Channel name → full webhook URL.
    pub channels: BTreeMap<String, String>,
    pub default_channel: Option<String>,
    pub username: String,
}

#[derive(Debug, Clone)]
pub struct StreamTransportConfig {
    pub secret_key: String,
    pub project_id: String,
    pub log_name: String,
    pub url: String,
}

/// Output of [`ConfigVerifier::verify`](super::ConfigVerifier::verify); owned by the dispatcher.
#[derive(Debug, Clone)]
pub struct VerifiedConfig {
    pub project: Project,
    pub environment: Environment,
    /// `None` means nothing is logged.
    pub transport: Option<TransportKind>,
    pub base_level: Severity,
    pub extend_console: bool,
    pub file: Option<FileTransportConfig>,
    pub http: Option<HttpTransportConfig>,
    pub socket_io: Option<SocketIoTransportConfig>,
    pub slack: Option<SlackTransportConfig>,
    pub discord: Option<DiscordTransportConfig>,
    pub stream: Option<StreamTransportConfig>,
}
