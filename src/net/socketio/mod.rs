//! Socket.IO capability used by the socket and stream transports.
//!
//! Transports only see [`SocketConnector`] and [`SocketHandle`]; the bundled
//! [`TungsteniteConnector`] speaks Engine.IO v4 over a websocket on a background thread.

mod client;
pub mod packet;

pub use client::{TungsteniteConnector, engine_url};
pub use packet::{Packet, PacketError};

use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Receives the arguments of the server's acknowledgement.
pub type AckCallback = Box<dyn FnOnce(Vec<Value>) + Send>;

/// Connection lifecycle notifications; called from the connection thread.
pub type SocketListener = Arc<dyn Fn(SocketEvent) + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocketEvent {
    Connected,
    Disconnected(String),
    Error(String),
}

/// Where and how to connect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectOptions {
    /// `http(s)://` or `ws(s)://` server address.
    pub url: String,
    /// Sent with the websocket handshake.
    pub headers: BTreeMap<String, String>,
}

/// Starts connections. Must not block on the network.
pub trait SocketConnector: Send + Sync {
    /// # Errors
    /// Only failures detectable without touching the network (malformed URL, thread spawn).
    fn connect(
        &self,
        options: ConnectOptions,
        listener: SocketListener,
    ) -> Result<Box<dyn SocketHandle>, SocketError>;
}

/// A live (or still connecting) socket. Emits are queued until the connection is ready.
pub trait SocketHandle: Send + Sync {
    fn emit(&self, event: &str, payload: Value, ack: Option<AckCallback>);

    /// Sends a disconnect and stops the connection. Later emits are dropped.
    fn close(&self);
}

#[derive(Debug)]
pub enum SocketError {
    InvalidUrl(String),
    InvalidHeader(String),
    Handshake(Box<tungstenite::Error>),
    Io(std::io::Error),
}

impl fmt::Display for SocketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUrl(url) => write!(f, "invalid socket url: {url}"),
            Self::InvalidHeader(name) => write!(f, "invalid handshake header: {name}"),
            Self::Handshake(e) => write!(f, "websocket handshake failed: {e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for SocketError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Handshake(e) => Some(e.as_ref()),
            Self::Io(e) => Some(e),
            Self::InvalidUrl(_) | Self::InvalidHeader(_) => None,
        }
    }
}

impl From<tungstenite::Error> for SocketError {
    fn from(e: tungstenite::Error) -> Self {
        Self::Handshake(Box::new(e))
    }
}

impl From<std::io::Error> for SocketError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
