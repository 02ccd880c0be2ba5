//! Tests for loading raw configuration from TOML and JSON.

use relaylog::config::ConfigError;
use relaylog::{Environment, RawConfig};
use std::fs;
use tempfile::tempdir;

const TOML: &str = r#"
transport = "file"
base_level = "warn"

[project]
name = "Logger"
version = "1.0.0"

[environment]
key = "APP_ENV"
development = "dev"
production = "prod"

[production]
transport = "http"

[file]
directory = "/tmp/logs"
file_type = "log"
prefix = "api"

[http]
base_url = "https://logs.example.com/ingest"
[http.headers]
authorization = "Bearer token"
"#;

#[test]
fn parse_toml() {
    let config = RawConfig::from_toml_str(TOML).unwrap();
    assert_eq!(config.project.name.as_deref(), Some("Logger"));
    assert_eq!(config.transport.as_deref(), Some("file"));
    assert_eq!(config.base_level.as_deref(), Some("warn"));

    let env = config.environment.unwrap();
    assert_eq!(env.key.as_deref(), Some("APP_ENV"));
    assert_eq!(
        config.production.unwrap().transport.as_deref(),
        Some("http")
    );

    let file = config.file.unwrap();
    assert_eq!(file.prefix.as_deref(), Some("api"));

    let http = config.http.unwrap();
    assert_eq!(http.headers["authorization"], "Bearer token");
}

#[test]
fn parse_json_with_camel_case_keys() {
    let json = r#"{
        "project": {"name": "svc"},
        "transport": "socket_io",
        "baseLevel": "info",
        "extendConsole": true,
        "socketIO": {"baseUrl": "http://localhost:4000", "events": {"log": "entry"}},
        "slack": {"webhookUrl": "https://hooks.slack.com/services/x", "iconEmoji": ":bell:"}
    }"#;
    let config = RawConfig::from_json_str(json).unwrap();
    assert_eq!(config.base_level.as_deref(), Some("info"));
    assert!(config.extend_console);

    let socket = config.socket_io.unwrap();
    assert_eq!(socket.base_url.as_deref(), Some("http://localhost:4000"));
    assert_eq!(socket.events.unwrap().log.as_deref(), Some("entry"));

    let slack = config.slack.unwrap();
    assert_eq!(slack.icon_emoji.as_deref(), Some(":bell:"));
}

#[test]
fn unknown_top_level_key_is_rejected() {
    let err = RawConfig::from_toml_str("colour = true\n[project]\nname = \"x\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::UnknownKey(ref k) if k == "colour"));

    let err = RawConfig::from_json_str(r#"{"project": {"name": "x"}, "verbose": 1}"#).unwrap_err();
    assert!(matches!(err, ConfigError::UnknownKey(ref k) if k == "verbose"));
}

#[test]
fn syntax_errors() {
    assert!(matches!(
        RawConfig::from_toml_str("transport = "),
        Err(ConfigError::Parse(_))
    ));
    assert!(matches!(
        RawConfig::from_json_str("{"),
        Err(ConfigError::Json(_))
    ));
}

#[test]
fn load_from_picks_format_by_extension() {
    let dir = tempdir().unwrap();

    let toml_path = dir.path().join("relaylog.toml");
    fs::write(&toml_path, TOML).unwrap();
    let config = RawConfig::load_from(&toml_path).unwrap();
    assert_eq!(config.project.name.as_deref(), Some("Logger"));

    let json_path = dir.path().join("relaylog.json");
    fs::write(&json_path, r#"{"project": {"name": "from-json"}}"#).unwrap();
    let config = RawConfig::load_from(&json_path).unwrap();
    assert_eq!(config.project.name.as_deref(), Some("from-json"));
}

#[test]
fn load_missing_file() {
    let dir = tempdir().unwrap();
    let result = RawConfig::load_from(&dir.path().join("absent.toml"));
    assert!(matches!(result, Err(ConfigError::Io(_))));
}

#[test]
fn builder_methods() {
    let config = RawConfig::new("api")
        .version("2.0.0")
        .transport("console")
        .base_level("error")
        .extend_console(true)
        .environment("APP_ENV", "dev", "prod")
        .rules(Environment::Production, "http");

    assert_eq!(config.project.version.as_deref(), Some("2.0.0"));
    assert!(config.extend_console);
    assert!(config.development.is_none());
    assert_eq!(
        config.production.unwrap().transport.as_deref(),
        Some("http")
    );
}

#[test]
fn default_path_ends_with_config_file() {
    if let Ok(path) = RawConfig::default_path() {
        assert!(path.ends_with("relaylog/relaylog.toml"));
    }
}
