//! Tests for the Engine.IO / Socket.IO packet codec.

use relaylog::net::socketio::{Packet, PacketError, engine_url};
use serde_json::json;

#[test]
fn encode_control_packets() {
    assert_eq!(Packet::Ping.encode(), "2");
    assert_eq!(Packet::Pong.encode(), "3");
    assert_eq!(Packet::Connect(None).encode(), "40");
    assert_eq!(Packet::Connect(Some(json!({"token": "t"}))).encode(), r#"40{"token":"t"}"#);
    assert_eq!(Packet::Disconnect.encode(), "41");
}

#[test]
fn encode_event_with_ack_id() {
    let packet = Packet::Event {
        id: Some(12),
        name: "log".into(),
        args: vec![json!({"level": "INFO"})],
    };
    assert_eq!(packet.encode(), r#"4212["log",{"level":"INFO"}]"#);

    let no_ack = Packet::Event {
        id: None,
        name: "hello".into(),
        args: vec![],
    };
    assert_eq!(no_ack.encode(), r#"42["hello"]"#);
}

#[test]
fn decode_open_and_connect() {
    let open = Packet::decode(r#"0{"sid":"abc","pingInterval":25000}"#).unwrap();
    assert_eq!(open, Packet::Open(json!({"sid": "abc", "pingInterval": 25000})));

    let connect = Packet::decode(r#"40{"sid":"xyz"}"#).unwrap();
    assert_eq!(connect, Packet::Connect(Some(json!({"sid": "xyz"}))));
}

#[test]
fn decode_ack() {
    let ack = Packet::decode(r#"433[{"error":"denied"}]"#).unwrap();
    assert_eq!(
        ack,
        Packet::Ack {
            id: 3,
            args: vec![json!({"error": "denied"})],
        }
    );
}

#[test]
fn decode_event_in_namespace() {
    let event = Packet::decode(r#"42/admin,7["notice","hi"]"#).unwrap();
    assert_eq!(
        event,
        Packet::Event {
            id: Some(7),
            name: "notice".into(),
            args: vec![json!("hi")],
        }
    );
}

#[test]
fn decode_connect_error_and_disconnect() {
    assert_eq!(
        Packet::decode(r#"44{"message":"unauthorized"}"#).unwrap(),
        Packet::ConnectError(json!({"message": "unauthorized"}))
    );
    assert_eq!(Packet::decode("41").unwrap(), Packet::Disconnect);
    assert_eq!(Packet::decode("1").unwrap(), Packet::Close);
}

#[test]
fn decode_errors() {
    assert_eq!(Packet::decode(""), Err(PacketError::Empty));
    assert_eq!(Packet::decode("9"), Err(PacketError::UnknownType('9')));
    assert_eq!(Packet::decode("5"), Err(PacketError::Unsupported('5')));
    assert!(matches!(
        Packet::decode("42{"),
        Err(PacketError::InvalidPayload(_))
    ));
    assert!(matches!(
        Packet::decode("43[]"),
        Err(PacketError::InvalidPayload(_))
    ));
}

#[test]
fn engine_url_rewrites_scheme_and_path() {
    assert_eq!(
        engine_url("http://localhost:3000").unwrap(),
        "ws://localhost:3000/socket.io/?EIO=4&transport=websocket"
    );
    assert_eq!(
        engine_url("https://logs.example.com/some/path").unwrap(),
        "wss://logs.example.com/socket.io/?EIO=4&transport=websocket"
    );
    assert!(engine_url("ftp://example.com").is_err());
    assert!(engine_url("http://").is_err());
}
