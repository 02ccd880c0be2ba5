//! Tests for the dispatcher lifecycle, filtering and console output.

mod common;

use common::{MockConnector, RecordingHttp, dispatcher};
use relaylog::config::{ConfigError, HttpConfig};
use relaylog::console::CaptureConsole;
use relaylog::{Dispatcher, RawConfig, Severity, TransportKind, args};
use serde_json::json;
use std::sync::Arc;

fn setup() -> (CaptureConsole, Dispatcher) {
    let console = CaptureConsole::new();
    let logger = dispatcher(&console, &RecordingHttp::new(), &MockConnector::new());
    (console, logger)
}

#[test]
fn uninitialized_calls_warn_and_return() {
    let (console, logger) = setup();
    assert!(!logger.is_configured());

    logger.info("hello");
    assert!(console.contains("Not configured, call init() first"));
    assert_eq!(logger.stats().forwarded, 0);
    assert_eq!(logger.active_transport(), None);
}

#[test]
fn console_line_format() {
    let (console, logger) = setup();
    logger
        .init(RawConfig::new("api").version("2.1.0").transport("console"))
        .unwrap();
    console.clear();

    logger.info(args!["user", 42]);

    let lines = console.lines_at(Severity::Info);
    assert_eq!(lines.len(), 1);
    let line = &lines[0];
    assert!(line.starts_with("[api:2.1.0 | "), "{line}");
    assert!(line.ends_with(" | INFO] user 42"), "{line}");
}

#[test]
fn console_colors_follow_level() {
    let console = CaptureConsole::new();
    let logger = Dispatcher::builder()
        .console(Arc::new(console.clone()))
        .colors(true)
        .build();
    logger
        .init(RawConfig::new("api").transport("console"))
        .unwrap();
    console.clear();

    logger.error("boom");
    let lines = console.lines_at(Severity::Error);
    assert!(lines[0].starts_with("\x1b[38;2;231;76;60m[api:1.0.0 |"));
}

#[test]
fn second_init_is_ignored() {
    let (console, logger) = setup();
    logger
        .init(RawConfig::new("first").transport("console"))
        .unwrap();
    logger
        .init(
            RawConfig::new("second")
                .transport("http")
                .http(HttpConfig {
                    base_url: Some("https://example.com".into()),
                    ..HttpConfig::default()
                }),
        )
        .unwrap();

    assert!(console.contains("Already configured"));
    assert_eq!(logger.active_transport(), Some(TransportKind::Console));
    assert_eq!(logger.verified().unwrap().project.name, "first");
}

#[test]
fn missing_name_fails_init() {
    let (_, logger) = setup();
    let result = logger.init(RawConfig::default().transport("console"));
    assert!(matches!(result, Err(ConfigError::MissingProjectName)));
    assert!(!logger.is_configured());
}

#[test]
fn invalid_transport_uses_console() {
    let (console, logger) = setup();
    logger
        .init(RawConfig::new("api").transport("fax"))
        .unwrap();
    assert_eq!(logger.active_transport(), Some(TransportKind::Console));

    console.clear();
    logger.warn("still visible");
    assert!(console.contains("WARN] still visible"));
}

#[test]
fn no_transport_drops_everything() {
    let (console, logger) = setup();
    logger.init(RawConfig::new("api")).unwrap();
    assert!(logger.is_configured());
    assert_eq!(logger.active_transport(), None);

    console.clear();
    logger.error("gone");
    assert!(console.lines().is_empty());
    assert_eq!(logger.stats().forwarded, 0);
}

#[test]
fn filtering_counts() {
    let (console, logger) = setup();
    logger
        .init(RawConfig::new("api").transport("console").base_level("success"))
        .unwrap();
    console.clear();

    logger.plain("a");
    logger.info("b");
    logger.success("c");
    logger.warn("d");
    logger.error("e");

    let stats = logger.stats();
    assert_eq!(stats.filtered, 2);
    assert_eq!(stats.forwarded, 3);
    assert!(!console.contains("] a"));
    assert!(console.contains("SUCCESS] c"));
}

#[test]
fn alerts_on_console_append_extras() {
    let (console, logger) = setup();
    logger
        .init(RawConfig::new("api").transport("console"))
        .unwrap();
    console.clear();

    logger
        .alerts()
        .error("db down", Some("ops"), Some(vec![json!({"host": "db1"})]));
    assert!(console.contains(r#"ERROR] db down {"host":"db1"}"#));
}

#[test]
fn verified_config_is_exposed() {
    let (_, logger) = setup();
    assert!(logger.verified().is_none());
    logger
        .init(RawConfig::new("api").transport("console").base_level("warn"))
        .unwrap();

    let verified = logger.verified().unwrap();
    assert_eq!(verified.base_level, Severity::Warn);
    assert_eq!(verified.transport, Some(TransportKind::Console));
}

#[test]
fn concurrent_logging() {
    let (console, logger) = setup();
    logger
        .init(RawConfig::new("api").transport("console"))
        .unwrap();
    console.clear();

    std::thread::scope(|s| {
        for t in 0..4 {
            let logger = &logger;
            s.spawn(move || {
                for i in 0..25 {
                    logger.info(args!["thread", t, i]);
                }
            });
        }
    });

    assert_eq!(logger.stats().forwarded, 100);
    assert_eq!(console.lines_at(Severity::Info).len(), 100);
}
