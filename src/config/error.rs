//! Configuration error types. Only these abort initialization; every other problem degrades.

/// Error type for configuration loading and verification.
#[derive(Debug)]
pub enum ConfigError {
    /// `project.name` missing or empty.
    MissingProjectName,
    /// The environment variable named in `environment.key` matched neither configured value.
    EnvironmentUnresolvable {
        key: String,
        development: String,
        production: String,
    },
    /// A top-level key relaylog does not know.
    UnknownKey(String),
    /// I/O error reading a config file.
    Io(std::io::Error),
    /// TOML parsing error.
    Parse(toml::de::Error),
    /// JSON parsing error.
    Json(serde_json::Error),
    /// Config directory not found.
    ConfigDirNotFound,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingProjectName => write!(f, "project.name is required"),
            Self::EnvironmentUnresolvable {
                key,
                development,
                production,
            } => write!(
                f,
                "environment not resolvable: {key} is not set to '{development}' or '{production}'"
            ),
            Self::UnknownKey(key) => write!(f, "unknown key: {key}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Parse(e) => write!(f, "parse error: {e}"),
            Self::Json(e) => write!(f, "JSON error: {e}"),
            Self::ConfigDirNotFound => write!(f, "config directory not found"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::MissingProjectName
            | Self::EnvironmentUnresolvable { .. }
            | Self::UnknownKey(_)
            | Self::ConfigDirNotFound => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Parse(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}
