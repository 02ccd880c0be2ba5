//! Engine.IO v4 / Socket.IO v5 text packet codec (default namespace, no binary attachments).
//!
//! A websocket text frame carries one Engine.IO packet: a type digit followed by data.
//! Socket.IO packets ride inside Engine.IO `message` (`4`) packets:
//! `4<type>[<namespace>,][<ack id>][<json>]`.

use serde_json::Value;
use std::fmt;

/// One decoded or to-be-encoded frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Packet {
    /// Engine.IO handshake payload (`sid`, `pingInterval`, ...).
    Open(Value),
    Close,
    Ping,
    Pong,
    Noop,
    /// Namespace connect; the server answers with its own `Connect` carrying `sid`.
    Connect(Option<Value>),
    Disconnect,
    /// `id` requests an acknowledgement.
    Event {
        id: Option<u64>,
        name: String,
        args: Vec<Value>,
    },
    Ack {
        id: u64,
        args: Vec<Value>,
    },
    ConnectError(Value),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PacketError {
    Empty,
    UnknownType(char),
    /// Binary packets and transport upgrades are not spoken here.
    Unsupported(char),
    InvalidPayload(String),
}

impl fmt::Display for PacketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty packet"),
            Self::UnknownType(c) => write!(f, "unknown packet type '{c}'"),
            Self::Unsupported(c) => write!(f, "unsupported packet type '{c}'"),
            Self::InvalidPayload(msg) => write!(f, "invalid payload: {msg}"),
        }
    }
}

impl std::error::Error for PacketError {}

impl Packet {
    #[must_use]
    pub fn encode(&self) -> String {
        match self {
            Self::Open(data) => format!("0{data}"),
            Self::Close => "1".to_string(),
            Self::Ping => "2".to_string(),
            Self::Pong => "3".to_string(),
            Self::Noop => "6".to_string(),
            Self::Connect(None) => "40".to_string(),
            Self::Connect(Some(auth)) => format!("40{auth}"),
            Self::Disconnect => "41".to_string(),
            Self::Event { id, name, args } => {
                let mut items = Vec::with_capacity(args.len() + 1);
                items.push(Value::String(name.clone()));
                items.extend(args.iter().cloned());
                let id = id.map(|id| id.to_string()).unwrap_or_default();
                format!("42{id}{}", Value::Array(items))
            }
            Self::Ack { id, args } => format!("43{id}{}", Value::Array(args.clone())),
            Self::ConnectError(data) => format!("44{data}"),
        }
    }

    /// # Errors
    /// Empty frames, unknown or binary packet types, malformed JSON payloads.
    pub fn decode(frame: &str) -> Result<Self, PacketError> {
        let mut chars = frame.chars();
        let kind = chars.next().ok_or(PacketError::Empty)?;
        let rest = chars.as_str();

        match kind {
            '0' => Ok(Self::Open(parse_optional(rest)?.unwrap_or(Value::Null))),
            '1' => Ok(Self::Close),
            '2' => Ok(Self::Ping),
            '3' => Ok(Self::Pong),
            '4' => decode_message(rest),
            '5' => Err(PacketError::Unsupported(kind)),
            '6' => Ok(Self::Noop),
            other => Err(PacketError::UnknownType(other)),
        }
    }
}

fn decode_message(data: &str) -> Result<Packet, PacketError> {
    let mut chars = data.chars();
    let kind = chars.next().ok_or(PacketError::Empty)?;
    let mut rest = chars.as_str();

    // Non-default namespaces prefix the payload with `/name,`.
    if rest.starts_with('/') {
        rest = rest.split_once(',').map_or("", |(_, tail)| tail);
    }

    let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    let (id, payload) = rest.split_at(digits);
    let id = if id.is_empty() {
        None
    } else {
        Some(
            id.parse::<u64>()
                .map_err(|e| PacketError::InvalidPayload(e.to_string()))?,
        )
    };

    match kind {
        '0' => Ok(Packet::Connect(parse_optional(payload)?)),
        '1' => Ok(Packet::Disconnect),
        '2' => {
            let mut items = parse_array(payload)?;
            if items.is_empty() {
                return Err(PacketError::InvalidPayload("event without a name".into()));
            }
            let Value::String(name) = items.remove(0) else {
                return Err(PacketError::InvalidPayload("event name is not a string".into()));
            };
            Ok(Packet::Event {
                id,
                name,
                args: items,
            })
        }
        '3' => {
            let id = id.ok_or_else(|| PacketError::InvalidPayload("ack without an id".into()))?;
            Ok(Packet::Ack {
                id,
                args: parse_array(payload)?,
            })
        }
        '4' => Ok(Packet::ConnectError(
            parse_optional(payload)?.unwrap_or(Value::Null),
        )),
        '5' | '6' => Err(PacketError::Unsupported(kind)),
        other => Err(PacketError::UnknownType(other)),
    }
}

fn parse_optional(payload: &str) -> Result<Option<Value>, PacketError> {
    if payload.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(payload)
        .map(Some)
        .map_err(|e| PacketError::InvalidPayload(e.to_string()))
}

fn parse_array(payload: &str) -> Result<Vec<Value>, PacketError> {
    match parse_optional(payload)? {
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(PacketError::InvalidPayload(format!(
            "expected an array, got {other}"
        ))),
        None => Ok(Vec::new()),
    }
}
