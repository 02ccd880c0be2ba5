//! Tests for the Socket.IO and stream transports against a mock connector.

mod common;

use common::{MockConnector, RecordingHttp, dispatcher};
use relaylog::config::{SocketEventsConfig, SocketIoConfig, StreamConfig};
use relaylog::console::CaptureConsole;
use relaylog::net::SocketEvent;
use relaylog::{RawConfig, TransportKind, args};
use serde_json::json;
use std::sync::atomic::Ordering;

fn socket_config() -> RawConfig {
    RawConfig::new("api").transport("socket_io").socket_io(SocketIoConfig {
        base_url: Some("http://localhost:4000".into()),
        events: Some(SocketEventsConfig {
            connection: Some("hello".into()),
            disconnect: Some("bye".into()),
            log: Some("entry".into()),
        }),
        ..SocketIoConfig::default()
    })
}

#[test]
fn connects_lazily_once() {
    let console = CaptureConsole::new();
    let sockets = MockConnector::new().ack_reply(vec![json!({"ok": true})]);
    let logger = dispatcher(&console, &RecordingHttp::new(), &sockets);
    logger.init(socket_config()).unwrap();
    assert_eq!(sockets.connects.load(Ordering::SeqCst), 0);

    logger.info("one");
    logger.info("two");
    assert_eq!(sockets.connects.load(Ordering::SeqCst), 1);
    assert_eq!(sockets.emitted_events(), vec!["hello", "entry", "entry"]);
}

#[test]
fn log_payload_shape() {
    let console = CaptureConsole::new();
    let sockets = MockConnector::new();
    let logger = dispatcher(&console, &RecordingHttp::new(), &sockets);
    logger.init(socket_config()).unwrap();

    logger.error(args!["boom", json!({"code": 7})]);

    let emitted = sockets.emitted();
    let (event, payload) = emitted.last().unwrap();
    assert_eq!(event, "entry");
    assert_eq!(payload["level"], "ERROR");
    assert_eq!(payload["data"], json!(["boom", {"code": 7}]));
    assert!(payload["timeStamp"].is_string());

    let (hello, greeting) = &emitted[0];
    assert_eq!(hello, "hello");
    assert_eq!(greeting["message"], "Connected to socket.io server");
    assert_eq!(greeting["project"]["name"], "api");
}

#[test]
fn failure_ack_demotes_later_calls() {
    let console = CaptureConsole::new();
    let sockets = MockConnector::new().ack_reply(vec![json!({"error": "quota exceeded"})]);
    let logger = dispatcher(&console, &RecordingHttp::new(), &sockets);
    logger.init(socket_config()).unwrap();

    logger.info("first");
    assert_eq!(logger.active_transport(), Some(TransportKind::Console));
    assert!(console.contains("quota exceeded"));
    assert!(console.contains("Reverting to console transport"));

    console.clear();
    logger.info("second");
    assert!(console.contains("INFO] second"));
    assert_eq!(sockets.emitted_events(), vec!["hello", "entry"]);
}

#[test]
fn connection_error_demotes() {
    let console = CaptureConsole::new();
    let sockets = MockConnector::new().on_connect(SocketEvent::Error("refused".into()));
    let logger = dispatcher(&console, &RecordingHttp::new(), &sockets);
    logger.init(socket_config()).unwrap();

    logger.info("lost in transit");
    assert_eq!(logger.active_transport(), Some(TransportKind::Console));
    assert!(console.contains("socket_io connection error: refused"));
}

#[test]
fn connect_failure_is_synchronous_demotion() {
    let console = CaptureConsole::new();
    let sockets = MockConnector::new().refuse();
    let logger = dispatcher(&console, &RecordingHttp::new(), &sockets);
    logger.init(socket_config()).unwrap();

    logger.warn("never sent");
    assert_eq!(logger.active_transport(), Some(TransportKind::Console));
    assert_eq!(logger.stats().forwarded, 0);
}

#[test]
fn drop_sends_disconnect_event_and_closes() {
    let console = CaptureConsole::new();
    let sockets = MockConnector::new();
    {
        let logger = dispatcher(&console, &RecordingHttp::new(), &sockets);
        logger.init(socket_config()).unwrap();
        logger.info("x");
    }

    assert_eq!(sockets.emitted_events().last().map(String::as_str), Some("bye"));
    assert!(sockets.closed.load(Ordering::SeqCst));
}

#[test]
fn stream_uses_credentials_and_add_log() {
    let console = CaptureConsole::new();
    let sockets = MockConnector::new();
    let logger = dispatcher(&console, &RecordingHttp::new(), &sockets);
    logger
        .init(RawConfig::new("api").transport("stream").stream(StreamConfig {
            secret_key: Some("sk".into()),
            project_id: Some("p-1".into()),
            log_name: Some("api-logs".into()),
            url: None,
        }))
        .unwrap();

    logger.success("ready");

    let options = sockets.options.lock().unwrap().clone();
    assert_eq!(options[0].url, "http://localhost:3000");
    assert_eq!(options[0].headers["projectId"], "p-1");
    assert_eq!(options[0].headers["key"], "sk");

    let emitted = sockets.emitted();
    assert_eq!(emitted.len(), 1);
    let (event, payload) = &emitted[0];
    assert_eq!(event, "addLog");
    assert_eq!(payload["logName"], "api-logs");
    assert_eq!(payload["level"], "SUCCESS");
    assert_eq!(payload["data"], json!(["ready"]));
}
