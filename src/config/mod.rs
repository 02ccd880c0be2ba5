//! Configuration loading (TOML or JSON) and the verifier that turns it into a [`VerifiedConfig`].
//!
//! Raw sections live in `structs`, verified ones in `verified`; loading and key checking
//! stay here so the serde schema does not depend on where the text came from.

mod error;
mod structs;
mod verified;
mod verify;

pub use error::ConfigError;
pub use structs::{
    DiscordConfig, EnvironmentConfig, FileConfig, HealthCheckConfig, HttpConfig, ProjectConfig,
    RulesConfig, SlackConfig, SocketEventsConfig, SocketIoConfig, StreamConfig,
};
pub use verified::{
    DiscordTransportConfig, Environment, FileTransportConfig, FileType, HealthCheck,
    HttpTransportConfig, Project, SlackTransportConfig, SocketEvents, SocketIoTransportConfig,
    StreamTransportConfig, TransportKind, VerifiedConfig,
};
pub use verify::{ConfigVerifier, EnvLookup, process_env};

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level keys accepted in config text, including the camelCase spellings.
const KNOWN_KEYS: &[&str] = &[
    "project",
    "transport",
    "base_level",
    "baseLevel",
    "extend_console",
    "extendConsole",
    "environment",
    "envIdentifier",
    "development",
    "production",
    "file",
    "http",
    "socket_io",
    "socketIO",
    "slack",
    "discord",
    "stream",
];

/// Configuration exactly as supplied. Nothing here is trusted until [`ConfigVerifier`] ran.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    pub project: ProjectConfig,
    /// Transport name; absent or `"none"` disables output.
    pub transport: Option<String>,
    #[serde(alias = "baseLevel")]
    pub base_level: Option<String>,
    #[serde(alias = "extendConsole")]
    pub extend_console: bool,
    #[serde(alias = "envIdentifier")]
    pub environment: Option<EnvironmentConfig>,
    pub development: Option<RulesConfig>,
    pub production: Option<RulesConfig>,
    pub file: Option<FileConfig>,
    pub http: Option<HttpConfig>,
    #[serde(alias = "socketIO")]
    pub socket_io: Option<SocketIoConfig>,
    pub slack: Option<SlackConfig>,
    pub discord: Option<DiscordConfig>,
    pub stream: Option<StreamConfig>,
}

impl RawConfig {
    /// Starts a config for project `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            project: ProjectConfig {
                name: Some(name.into()),
                version: None,
            },
            ..Self::default()
        }
    }

    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.project.version = Some(version.into());
        self
    }

    #[must_use]
    pub fn transport(mut self, transport: impl Into<String>) -> Self {
        self.transport = Some(transport.into());
        self
    }

    #[must_use]
    pub fn base_level(mut self, level: impl Into<String>) -> Self {
        self.base_level = Some(level.into());
        self
    }

    #[must_use]
    pub const fn extend_console(mut self, enabled: bool) -> Self {
        self.extend_console = enabled;
        self
    }

    /// Reads `key` from the environment and matches it against the two values.
    #[must_use]
    pub fn environment(
        mut self,
        key: impl Into<String>,
        development: impl Into<String>,
        production: impl Into<String>,
    ) -> Self {
        self.environment = Some(EnvironmentConfig {
            key: Some(key.into()),
            development: Some(development.into()),
            production: Some(production.into()),
        });
        self
    }

    /// Overrides the top-level transport while `env` is active.
    #[must_use]
    pub fn rules(mut self, env: Environment, transport: impl Into<String>) -> Self {
        let rules = Some(RulesConfig {
            transport: Some(transport.into()),
        });
        match env {
            Environment::Development => self.development = rules,
            Environment::Production => self.production = rules,
        }
        self
    }

    #[must_use]
    pub fn file(mut self, file: FileConfig) -> Self {
        self.file = Some(file);
        self
    }

    #[must_use]
    pub fn http(mut self, http: HttpConfig) -> Self {
        self.http = Some(http);
        self
    }

    #[must_use]
    pub fn socket_io(mut self, socket_io: SocketIoConfig) -> Self {
        self.socket_io = Some(socket_io);
        self
    }

    #[must_use]
    pub fn slack(mut self, slack: SlackConfig) -> Self {
        self.slack = Some(slack);
        self
    }

    #[must_use]
    pub fn discord(mut self, discord: DiscordConfig) -> Self {
        self.discord = Some(discord);
        self
    }

    #[must_use]
    pub fn stream(mut self, stream: StreamConfig) -> Self {
        self.stream = Some(stream);
        self
    }

    /// Parses TOML text.
    ///
    /// # Errors
    /// Syntax errors, type mismatches, or a top-level key relaylog does not know.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let table: toml::Table = toml::from_str(content)?;
        check_keys(table.keys())?;
        Ok(toml::Value::Table(table).try_into()?)
    }

    /// Parses JSON text.
    ///
    /// # Errors
    /// Syntax errors, type mismatches, or a top-level key relaylog does not know.
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let value: serde_json::Value = serde_json::from_str(content)?;
        if let serde_json::Value::Object(ref map) = value {
            check_keys(map.keys())?;
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Loads from the default location, `<config dir>/relaylog/relaylog.toml`.
    ///
    /// # Errors
    /// The config directory cannot be determined, or the file cannot be read or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::default_path()?)
    }

    /// Loads from `path`; a `.json` extension selects JSON, anything else TOML.
    ///
    /// # Errors
    /// The file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let expanded = shellexpand::tilde(&path.to_string_lossy()).into_owned();
        let content = fs::read_to_string(&expanded)?;
        let is_json = Path::new(&expanded)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }

    /// XDG-compliant default path.
    ///
    /// # Errors
    /// The platform has no config directory.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        directories::ProjectDirs::from("", "", "relaylog")
            .map(|dirs| dirs.config_dir().join("relaylog.toml"))
            .ok_or(ConfigError::ConfigDirNotFound)
    }
}

fn check_keys<'a>(keys: impl IntoIterator<Item = &'a String>) -> Result<(), ConfigError> {
    for key in keys {
        if !KNOWN_KEYS.contains(&key.as_str()) {
            return Err(ConfigError::UnknownKey(key.clone()));
        }
    }
    Ok(())
}
