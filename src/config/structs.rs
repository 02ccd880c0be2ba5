//! Raw configuration sections as users write them.
//!
//! Every field is optional here; the verifier decides which gaps get a default and which
//! invalidate a whole section. camelCase aliases keep older JSON configs loading.

use crate::transport::BodyBuilder;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Project identity stamped on every record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub name: Option<String>,
    pub version: Option<String>,
}

/// Names the environment variable that selects development or production rules.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    /// Environment variable to read, e.g. `APP_ENV`.
    pub key: Option<String>,
    /// Value of `key` meaning development. Defaults to `development`.
    pub development: Option<String>,
    /// Value of `key` meaning production. Defaults to `production`.
    pub production: Option<String>,
}

/// Per-environment override of the active transport.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub transport: Option<String>,
}

/// File transport section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Existing, writable directory; `~` is expanded.
    pub directory: Option<String>,
    /// `json`, `log` or `txt`.
    #[serde(alias = "fileType")]
    pub file_type: Option<String>,
    /// Filename prefix, at most 10 characters of `[A-Za-z0-9_]`.
    pub prefix: Option<String>,
}

/// Optional reachability probe run once during verification.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HealthCheckConfig {
    pub path: Option<String>,
    pub method: Option<String>,
}

/// HTTP transport section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    #[serde(alias = "baseUrl", alias = "alertUrl")]
    pub base_url: Option<String>,
    pub headers: BTreeMap<String, String>,
    #[serde(alias = "healthCheck")]
    pub health_check: Option<HealthCheckConfig>,
    /// Replaces the default request body. Only settable from code.
    #[serde(skip)]
    pub body_builder: Option<BodyBuilder>,
}

/// Event names used by the Socket.IO transport.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SocketEventsConfig {
    /// Emitted once after connecting.
    pub connection: Option<String>,
    /// Emitted before the connection is closed.
    pub disconnect: Option<String>,
    /// Carries every log record. Defaults to `log`.
    pub log: Option<String>,
}

/// Socket.IO transport section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SocketIoConfig {
    #[serde(alias = "baseUrl")]
    pub base_url: Option<String>,
    pub headers: BTreeMap<String, String>,
    pub events: Option<SocketEventsConfig>,
}

/// Slack section: either a single webhook or a map of named channels.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SlackConfig {
    #[serde(alias = "webhookUrl")]
    pub webhook_url: Option<String>,
    /// Default channel name.
    pub channel: Option<String>,
    pub username: Option<String>,
    #[serde(alias = "iconEmoji")]
    pub icon_emoji: Option<String>,
    /// Channel name → `https://hooks.slack.com/services/...` URL.
    pub channels: BTreeMap<String, String>,
}

/// Discord section: either a single webhook or a map of named channels.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DiscordConfig {
    #[serde(alias = "webhookUrl")]
    pub webhook_url: Option<String>,
    pub username: Option<String>,
    /// Default channel name.
    pub channel: Option<String>,
    /// Channel name → webhook URL or `id/token` pair.
    pub channels: BTreeMap<String, String>,
}

/// Hosted log stream section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    #[serde(alias = "secretKey")]
    pub secret_key: Option<String>,
    #[serde(alias = "projectId")]
    pub project_id: Option<String>,
    #[serde(alias = "logName")]
    pub log_name: Option<String>,
    /// Stream server. Defaults to `http://localhost:3000`.
    pub url: Option<String>,
}
