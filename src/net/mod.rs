//! Network capabilities the remote transports call through.

pub mod http;
pub mod socketio;

/// Name of the thread that delivers HTTP requests.
pub const HTTP_THREAD: &str = "relaylog-http";
/// Name of every socket connection thread.
pub const SOCKET_THREAD: &str = "relaylog-socket";

pub use http::{HttpClient, HttpError, HttpMethod, HttpRequest, ReqwestClient};
pub use socketio::{
    AckCallback, ConnectOptions, SocketConnector, SocketError, SocketEvent, SocketHandle,
    SocketListener, TungsteniteConnector,
};
