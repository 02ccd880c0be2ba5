//! Turns a [`RawConfig`] into a [`VerifiedConfig`].
//!
//! Only a missing project name and an unresolvable environment are fatal. Everything else
//! degrades: a bad sub-config is dropped with a warning, and the active transport falls back
//! to console when its sub-config did not survive.

use super::{
    ConfigError, DiscordConfig, DiscordTransportConfig, Environment, EnvironmentConfig,
    FileConfig, FileTransportConfig, FileType, HealthCheck, HttpConfig, HttpTransportConfig,
    Project, RawConfig, SlackConfig, SlackTransportConfig, SocketEvents, SocketIoConfig,
    SocketIoTransportConfig, StreamConfig, StreamTransportConfig, TransportKind, VerifiedConfig,
};
use crate::internal::Diagnostics;
use crate::level::Severity;
use crate::net::{HttpClient, HttpMethod, HttpRequest};
use regex::Regex;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

const SCOPE: &str = "CONFIG";
const DEFAULT_VERSION: &str = "1.0.0";
const DEFAULT_LOG_EVENT: &str = "log";
const DEFAULT_STREAM_URL: &str = "http://localhost:3000";
const PREFIX_MAX_LEN: usize = 10;
const SLACK_WEBHOOK_PREFIX: &str = "https://hooks.slack.com/services/";
const DISCORD_WEBHOOK_BASE: &str = "https://discord.com/api/webhooks/";

static PREFIX_INVALID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9_]").expect("valid regex"));

/// Reads one environment variable. Injected so tests don't touch the process environment.
pub type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Lookup backed by [`std::env::var`].
#[must_use]
pub fn process_env() -> EnvLookup {
    Arc::new(|key| std::env::var(key).ok())
}

#[derive(Clone)]
pub struct ConfigVerifier {
    diagnostics: Diagnostics,
    env: EnvLookup,
    http: Option<Arc<dyn HttpClient>>,
}

impl std::fmt::Debug for ConfigVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigVerifier")
            .field("diagnostics", &self.diagnostics)
            .field("health_checks", &self.http.is_some())
            .finish_non_exhaustive()
    }
}

impl ConfigVerifier {
    #[must_use]
    pub fn new(diagnostics: Diagnostics) -> Self {
        Self {
            diagnostics,
            env: process_env(),
            http: None,
        }
    }

    #[must_use]
    pub fn env_lookup(mut self, env: EnvLookup) -> Self {
        self.env = env;
        self
    }

    /// Client for health check probes. Without one, health checks are skipped.
    #[must_use]
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http = Some(client);
        self
    }

    /// # Errors
    /// [`ConfigError::MissingProjectName`] or [`ConfigError::EnvironmentUnresolvable`].
    pub fn verify(&self, raw: RawConfig) -> Result<(VerifiedConfig, Environment), ConfigError> {
        let environment = self.resolve_environment(raw.environment.as_ref())?;
        let project = self.verify_project(raw.project.name, raw.project.version)?;

        let rules = match environment {
            Environment::Development => raw.development.as_ref(),
            Environment::Production => raw.production.as_ref(),
        };
        let transport_name = rules
            .and_then(|r| r.transport.clone())
            .or(raw.transport);
        let mut transport = self.resolve_transport(transport_name.as_deref());

        let file = raw.file.and_then(|c| self.verify_file(c));
        let http = raw.http.and_then(|c| self.verify_http(c));
        let socket_io = raw.socket_io.and_then(|c| self.verify_socket_io(c));
        let slack = raw.slack.and_then(|c| self.verify_slack(c));
        let discord = raw.discord.and_then(|c| self.verify_discord(c, &project));
        let stream = raw.stream.and_then(|c| self.verify_stream(c));

        if let Some(kind) = transport {
            let present = match kind {
                TransportKind::Console => true,
                TransportKind::File => file.is_some(),
                TransportKind::Http => http.is_some(),
                TransportKind::SocketIo => socket_io.is_some(),
                TransportKind::Stream => stream.is_some(),
                TransportKind::Slack => slack.is_some(),
                TransportKind::Discord => discord.is_some(),
            };
            if !present {
                self.diagnostics.warn(
                    SCOPE,
                    &format!("{kind} config missing or invalid, reverting to console transport"),
                );
                transport = Some(TransportKind::Console);
            }
        }

        let base_level = self.resolve_base_level(raw.base_level.as_deref());

        let verified = VerifiedConfig {
            project,
            environment,
            transport,
            base_level,
            extend_console: raw.extend_console,
            file,
            http,
            socket_io,
            slack,
            discord,
            stream,
        };
        Ok((verified, environment))
    }

    fn resolve_environment(
        &self,
        config: Option<&EnvironmentConfig>,
    ) -> Result<Environment, ConfigError> {
        let Some(config) = config else {
            return Ok(Environment::Development);
        };

        let development = config
            .development
            .clone()
            .unwrap_or_else(|| Environment::Development.as_str().to_string());
        let production = config
            .production
            .clone()
            .unwrap_or_else(|| Environment::Production.as_str().to_string());
        let key = config.key.clone().unwrap_or_default();

        let value = if key.is_empty() { None } else { (self.env)(&key) };
        match value {
            Some(v) if v == development => Ok(Environment::Development),
            Some(v) if v == production => Ok(Environment::Production),
            _ => Err(ConfigError::EnvironmentUnresolvable {
                key,
                development,
                production,
            }),
        }
    }

    fn verify_project(
        &self,
        name: Option<String>,
        version: Option<String>,
    ) -> Result<Project, ConfigError> {
        let name = name
            .filter(|n| !n.trim().is_empty())
            .ok_or(ConfigError::MissingProjectName)?;
        let version = match version.filter(|v| !v.trim().is_empty()) {
            Some(v) => v,
            None => {
                self.diagnostics.warn(
                    SCOPE,
                    &format!("project.version not set, using {DEFAULT_VERSION}"),
                );
                DEFAULT_VERSION.to_string()
            }
        };
        Ok(Project { name, version })
    }

    fn resolve_transport(&self, name: Option<&str>) -> Option<TransportKind> {
        let name = name.map(str::trim).filter(|n| !n.is_empty());
        match name {
            None => {
                self.diagnostics
                    .info(SCOPE, "No transport configured, nothing will be logged");
                None
            }
            Some(n) if n.eq_ignore_ascii_case("none") => {
                self.diagnostics
                    .info(SCOPE, "Transport is none, nothing will be logged");
                None
            }
            Some(n) => match n.parse::<TransportKind>() {
                Ok(kind) => Some(kind),
                Err(_) => {
                    self.diagnostics.warn(
                        SCOPE,
                        &format!("Invalid transport '{n}', falling back to console"),
                    );
                    Some(TransportKind::Console)
                }
            },
        }
    }

    fn resolve_base_level(&self, level: Option<&str>) -> Severity {
        let Some(level) = level.map(str::trim).filter(|l| !l.is_empty()) else {
            self.diagnostics
                .warn(SCOPE, "base_level not set, all logs will be logged");
            return Severity::Log;
        };
        level.parse().unwrap_or_else(|_| {
            self.diagnostics.warn(
                SCOPE,
                &format!("Invalid base_level '{level}', all logs will be logged"),
            );
            Severity::Log
        })
    }

    fn verify_file(&self, config: FileConfig) -> Option<FileTransportConfig> {
        let Some(directory) = config.directory.filter(|d| !d.trim().is_empty()) else {
            self.diagnostics
                .warn(SCOPE, "file.directory is required, file config ignored");
            return None;
        };
        let directory = PathBuf::from(shellexpand::tilde(&directory).into_owned());

        if let Err(reason) = check_writable_dir(&directory) {
            self.diagnostics.warn(
                SCOPE,
                &format!(
                    "file.directory {} {reason}, file config ignored",
                    directory.display()
                ),
            );
            return None;
        }

        let file_type = match config.file_type.as_deref().map(str::parse::<FileType>) {
            Some(Ok(t)) => t,
            Some(Err(t)) => {
                self.diagnostics.warn(
                    SCOPE,
                    &format!("Invalid file.file_type '{t}', using log"),
                );
                FileType::Log
            }
            None => {
                self.diagnostics
                    .warn(SCOPE, "file.file_type not set, using log");
                FileType::Log
            }
        };

        let prefix = config
            .prefix
            .map(|p| self.sanitize_prefix(&p))
            .unwrap_or_default();

        Some(FileTransportConfig {
            directory,
            file_type,
            prefix,
        })
    }

    /// Truncates to 10 characters, then replaces anything outside `[A-Za-z0-9_]` with `_`.
    #[must_use]
    pub fn sanitize_prefix(&self, prefix: &str) -> String {
        let mut result: String = prefix.chars().take(PREFIX_MAX_LEN).collect();
        if result.len() < prefix.len() {
            self.diagnostics.warn(
                SCOPE,
                &format!("file.prefix longer than {PREFIX_MAX_LEN} characters, truncated"),
            );
        }
        if PREFIX_INVALID.is_match(&result) {
            result = PREFIX_INVALID.replace_all(&result, "_").into_owned();
            self.diagnostics.warn(
                SCOPE,
                &format!("file.prefix contains invalid characters, using {result}"),
            );
        }
        result
    }

    fn verify_http(&self, config: HttpConfig) -> Option<HttpTransportConfig> {
        let Some(base_url) = config.base_url.filter(|u| !u.trim().is_empty()) else {
            self.diagnostics
                .warn(SCOPE, "http.base_url is required, http config ignored");
            return None;
        };

        let health_check = config.health_check.and_then(|hc| {
            let path = hc.path.unwrap_or_default();
            let method = match hc.method.as_deref().map(str::parse::<HttpMethod>) {
                Some(Ok(m)) => m,
                Some(Err(m)) => {
                    self.diagnostics.warn(
                        SCOPE,
                        &format!("Invalid http.health_check.method '{m}', health check skipped"),
                    );
                    return None;
                }
                None => HttpMethod::Get,
            };
            Some(HealthCheck { path, method })
        });

        if let Some(ref check) = health_check {
            self.probe(&base_url, &config.headers, check);
        }

        Some(HttpTransportConfig {
            base_url,
            headers: config.headers,
            health_check,
            body_builder: config.body_builder,
        })
    }

    fn probe(&self, base_url: &str, headers: &BTreeMap<String, String>, check: &HealthCheck) {
        let Some(ref client) = self.http else {
            return;
        };
        let url = format!("{}{}", base_url.trim_end_matches('/'), check.path);
        let request = HttpRequest::new(check.method, &url).headers(headers);

        match client.probe(request) {
            Ok(status) if (200..300).contains(&status) => {
                self.diagnostics
                    .success(SCOPE, &format!("Health check {url} passed"));
            }
            Ok(status) => self.diagnostics.warn(
                SCOPE,
                &format!("Health check {url} returned status {status}"),
            ),
            Err(e) => self
                .diagnostics
                .warn(SCOPE, &format!("Health check {url} failed: {e}")),
        }
    }

    fn verify_socket_io(&self, config: SocketIoConfig) -> Option<SocketIoTransportConfig> {
        let Some(base_url) = config.base_url.filter(|u| !u.trim().is_empty()) else {
            self.diagnostics
                .warn(SCOPE, "socket_io.base_url is required, socket_io config ignored");
            return None;
        };

        let events = match config.events {
            Some(events) => {
                let log = match events.log.filter(|l| !l.trim().is_empty()) {
                    Some(log) => log,
                    None => {
                        self.diagnostics.warn(
                            SCOPE,
                            &format!("socket_io.events.log not set, using '{DEFAULT_LOG_EVENT}'"),
                        );
                        DEFAULT_LOG_EVENT.to_string()
                    }
                };
                SocketEvents {
                    connection: events.connection.filter(|e| !e.is_empty()),
                    disconnect: events.disconnect.filter(|e| !e.is_empty()),
                    log,
                }
            }
            None => {
                self.diagnostics.warn(
                    SCOPE,
                    &format!("socket_io.events not set, logging to '{DEFAULT_LOG_EVENT}'"),
                );
                SocketEvents {
                    connection: None,
                    disconnect: None,
                    log: DEFAULT_LOG_EVENT.to_string(),
                }
            }
        };

        Some(SocketIoTransportConfig {
            base_url,
            headers: config.headers,
            events,
        })
    }

    fn verify_slack(&self, config: SlackConfig) -> Option<SlackTransportConfig> {
        if let Some(webhook_url) = config.webhook_url {
            let (Some(channel), Some(username), Some(icon)) =
                (config.channel, config.username, config.icon_emoji)
            else {
                self.diagnostics.warn(
                    SCOPE,
                    "slack needs webhook_url, channel, username and icon_emoji, slack config ignored",
                );
                return None;
            };
            let channels = BTreeMap::from([(channel.clone(), webhook_url)]);
            return Some(SlackTransportConfig {
                channels,
                default_channel: Some(channel),
                username: Some(username),
                icon: Some(icon),
            });
        }

        let channels: BTreeMap<String, String> = config
            .channels
            .into_iter()
            .filter(|(name, url)| {
                let valid = url.starts_with(SLACK_WEBHOOK_PREFIX);
                if !valid {
                    self.diagnostics.warn(
                        SCOPE,
                        &format!("slack channel {name} is not a Slack webhook URL, dropped"),
                    );
                }
                valid
            })
            .collect();

        if channels.is_empty() {
            self.diagnostics
                .warn(SCOPE, "slack has no valid channels, slack config ignored");
            return None;
        }

        let default_channel = config.channel.filter(|c| {
            let known = channels.contains_key(c);
            if !known {
                self.diagnostics.warn(
                    SCOPE,
                    &format!("slack default channel {c} is not defined in channels"),
                );
            }
            known
        });

        Some(SlackTransportConfig {
            channels,
            default_channel,
            username: config.username,
            icon: config.icon_emoji,
        })
    }

    fn verify_discord(
        &self,
        config: DiscordConfig,
        project: &Project,
    ) -> Option<DiscordTransportConfig> {
        if let Some(webhook_url) = config.webhook_url {
            let Some(username) = config.username else {
                self.diagnostics.warn(
                    SCOPE,
                    "discord needs webhook_url and username, discord config ignored",
                );
                return None;
            };
            let channel = config.channel.unwrap_or_else(|| "default".to_string());
            return Some(DiscordTransportConfig {
                channels: BTreeMap::from([(channel.clone(), webhook_url)]),
                default_channel: Some(channel),
                username,
            });
        }

        let channels: BTreeMap<String, String> = config
            .channels
            .into_iter()
            .filter_map(|(name, target)| match discord_webhook(&target) {
                Some(url) => Some((name, url)),
                None => {
                    self.diagnostics.warn(
                        SCOPE,
                        &format!("discord channel {name} has no webhook URL or id/token, dropped"),
                    );
                    None
                }
            })
            .collect();

        if channels.is_empty() {
            self.diagnostics
                .warn(SCOPE, "discord has no valid channels, discord config ignored");
            return None;
        }

        Some(DiscordTransportConfig {
            default_channel: config.channel.filter(|c| channels.contains_key(c)),
            channels,
            username: config.username.unwrap_or_else(|| project.name.clone()),
        })
    }

    fn verify_stream(&self, config: StreamConfig) -> Option<StreamTransportConfig> {
        let (Some(secret_key), Some(project_id), Some(log_name)) = (
            config.secret_key.filter(|s| !s.is_empty()),
            config.project_id.filter(|s| !s.is_empty()),
            config.log_name.filter(|s| !s.is_empty()),
        ) else {
            self.diagnostics.warn(
                SCOPE,
                "stream needs secret_key, project_id and log_name, stream config ignored",
            );
            return None;
        };

        Some(StreamTransportConfig {
            secret_key,
            project_id,
            log_name,
            url: config
                .url
                .filter(|u| !u.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_STREAM_URL.to_string()),
        })
    }
}

/// Full webhook URL for a channel value; bare `id/token` pairs are expanded.
fn discord_webhook(target: &str) -> Option<String> {
    let target = target.trim();
    if target.starts_with("https://") || target.starts_with("http://") {
        return Some(target.to_string());
    }
    match target.split_once('/') {
        Some((id, token)) if !id.is_empty() && !token.is_empty() && !token.contains('/') => {
            Some(format!("{DISCORD_WEBHOOK_BASE}{id}/{token}"))
        }
        _ => None,
    }
}

fn check_writable_dir(path: &Path) -> Result<(), &'static str> {
    let metadata = fs::metadata(path).map_err(|_| "does not exist")?;
    if !metadata.is_dir() {
        return Err("is not a directory");
    }

    let probe = path.join(".relaylog-write-test");
    fs::write(&probe, b"").map_err(|_| "is not writable")?;
    let _ = fs::remove_file(&probe);
    Ok(())
}
