//! Blocking websocket client driven from a dedicated thread.
//!
//! The caller only ever pushes commands into a channel, so neither connecting nor emitting
//! blocks a log call. The thread polls the channel between short socket reads.

use crate::net::SOCKET_THREAD;
use super::packet::Packet;
use super::{
    AckCallback, ConnectOptions, SocketConnector, SocketError, SocketEvent, SocketHandle,
    SocketListener,
};
use serde_json::Value;
use std::collections::{BTreeMap, VecDeque};
use std::io;
use std::net::TcpStream;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};
use tungstenite::client::IntoClientRequest;
use tungstenite::http::{HeaderName, HeaderValue};
use tungstenite::stream::MaybeTlsStream;
use tungstenite::{Message, WebSocket};

const POLL_INTERVAL: Duration = Duration::from_millis(50);
/// Acks not answered within this window are forgotten.
const ACK_WINDOW: Duration = Duration::from_secs(60);
/// Upper bound on unanswered acks; the oldest is forgotten first.
const MAX_PENDING_ACKS: usize = 1024;

type Socket = WebSocket<MaybeTlsStream<TcpStream>>;

/// Builds the Engine.IO websocket endpoint for a Socket.IO server address.
///
/// Any path on `base` is dropped; only the default namespace is used.
///
/// # Errors
/// The scheme is not one of `http`, `https`, `ws`, `wss`, or the host is missing.
pub fn engine_url(base: &str) -> Result<String, SocketError> {
    let trimmed = base.trim();
    let (scheme, rest) = [
        ("https://", "wss://"),
        ("http://", "ws://"),
        ("wss://", "wss://"),
        ("ws://", "ws://"),
    ]
    .iter()
    .find_map(|(from, to)| trimmed.strip_prefix(from).map(|rest| (*to, rest)))
    .ok_or_else(|| SocketError::InvalidUrl(base.to_string()))?;

    let host = rest.split(['/', '?']).next().unwrap_or_default();
    if host.is_empty() {
        return Err(SocketError::InvalidUrl(base.to_string()));
    }

    Ok(format!("{scheme}{host}/socket.io/?EIO=4&transport=websocket"))
}

/// Default [`SocketConnector`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TungsteniteConnector;

impl SocketConnector for TungsteniteConnector {
    fn connect(
        &self,
        options: ConnectOptions,
        listener: SocketListener,
    ) -> Result<Box<dyn SocketHandle>, SocketError> {
        let url = engine_url(&options.url)?;
        let (tx, rx) = mpsc::channel();

        thread::Builder::new()
            .name(SOCKET_THREAD.into())
            .spawn(move || run(&url, &options.headers, &rx, &listener))?;

        Ok(Box::new(ChannelHandle { commands: tx }))
    }
}

enum Command {
    Emit {
        event: String,
        payload: Value,
        ack: Option<AckCallback>,
    },
    Close,
}

struct ChannelHandle {
    commands: Sender<Command>,
}

impl SocketHandle for ChannelHandle {
    fn emit(&self, event: &str, payload: Value, ack: Option<AckCallback>) {
        // A closed channel means the connection thread already exited and reported why.
        let _ = self.commands.send(Command::Emit {
            event: event.to_string(),
            payload,
            ack,
        });
    }

    fn close(&self) {
        let _ = self.commands.send(Command::Close);
    }
}

/// Per-connection protocol state.
#[derive(Default)]
struct Session {
    connected: bool,
    next_ack: u64,
    /// Ack ids only grow, so the first entry is always the oldest.
    pending: BTreeMap<u64, (Instant, AckCallback)>,
    /// Emits accepted before the namespace connect was acknowledged.
    queued: VecDeque<(String, Value, Option<AckCallback>)>,
}

impl Session {
    /// Assigns the next ack id to `callback`, forgetting expired and excess entries first.
    fn register_ack(&mut self, callback: AckCallback, now: Instant) -> u64 {
        loop {
            let len = self.pending.len();
            let Some(entry) = self.pending.first_entry() else {
                break;
            };
            let expired = now.saturating_duration_since(entry.get().0) >= ACK_WINDOW;
            if !expired && len < MAX_PENDING_ACKS {
                break;
            }
            entry.remove();
        }

        let id = self.next_ack;
        self.next_ack += 1;
        self.pending.insert(id, (now, callback));
        id
    }

    fn take_ack(&mut self, id: u64) -> Option<AckCallback> {
        self.pending.remove(&id).map(|(_, callback)| callback)
    }
}

enum Flow {
    Continue,
    Stop,
}

fn run(
    url: &str,
    headers: &BTreeMap<String, String>,
    commands: &Receiver<Command>,
    listener: &SocketListener,
) {
    let mut socket = match open(url, headers) {
        Ok(socket) => socket,
        Err(e) => {
            listener(SocketEvent::Error(e.to_string()));
            return;
        }
    };
    let mut session = Session::default();

    loop {
        match pump_commands(&mut socket, &mut session, commands) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Stop) => return,
            Err(e) => {
                listener(SocketEvent::Error(e.to_string()));
                return;
            }
        }

        match socket.read() {
            Ok(Message::Text(text)) => {
                match handle_frame(&mut socket, &mut session, text.as_str(), listener) {
                    Ok(Flow::Continue) => {}
                    Ok(Flow::Stop) => return,
                    Err(e) => {
                        listener(SocketEvent::Error(e.to_string()));
                        return;
                    }
                }
            }
            Ok(Message::Close(_)) => {
                listener(SocketEvent::Disconnected(
                    "server closed the connection".into(),
                ));
                return;
            }
            Ok(_) => {}
            Err(tungstenite::Error::Io(ref e))
                if matches!(
                    e.kind(),
                    io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
                ) => {}
            Err(e) => {
                listener(SocketEvent::Error(e.to_string()));
                return;
            }
        }
    }
}

fn open(url: &str, headers: &BTreeMap<String, String>) -> Result<Socket, SocketError> {
    let mut request = url.into_client_request()?;
    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| SocketError::InvalidHeader(name.clone()))?;
        let header_value =
            HeaderValue::from_str(value).map_err(|_| SocketError::InvalidHeader(name.clone()))?;
        request.headers_mut().insert(header_name, header_value);
    }

    let (socket, _response) = tungstenite::connect(request)?;
    set_read_timeout(&socket)?;
    Ok(socket)
}

/// Short read timeouts let the thread interleave reads with queued emits.
fn set_read_timeout(socket: &Socket) -> io::Result<()> {
    match socket.get_ref() {
        MaybeTlsStream::Plain(stream) => stream.set_read_timeout(Some(POLL_INTERVAL)),
        MaybeTlsStream::NativeTls(stream) => {
            stream.get_ref().set_read_timeout(Some(POLL_INTERVAL))
        }
        _ => Ok(()),
    }
}

fn send(socket: &mut Socket, packet: &Packet) -> Result<(), tungstenite::Error> {
    socket.send(Message::text(packet.encode()))
}

/// Moves queued commands into the session and, once connected, onto the wire.
fn pump_commands(
    socket: &mut Socket,
    session: &mut Session,
    commands: &Receiver<Command>,
) -> Result<Flow, tungstenite::Error> {
    let mut closing = false;
    loop {
        match commands.try_recv() {
            Ok(Command::Emit {
                event,
                payload,
                ack,
            }) => session.queued.push_back((event, payload, ack)),
            Ok(Command::Close) | Err(TryRecvError::Disconnected) => {
                closing = true;
                break;
            }
            Err(TryRecvError::Empty) => break,
        }
    }

    // Socket.IO drops events sent before the namespace connect is acknowledged.
    if session.connected {
        while let Some((event, payload, ack)) = session.queued.pop_front() {
            let id = ack.map(|callback| session.register_ack(callback, Instant::now()));
            send(
                socket,
                &Packet::Event {
                    id,
                    name: event,
                    args: vec![payload],
                },
            )?;
        }
    }

    if closing {
        let _ = send(socket, &Packet::Disconnect);
        let _ = socket.close(None);
        let _ = socket.flush();
        return Ok(Flow::Stop);
    }

    Ok(Flow::Continue)
}

fn handle_frame(
    socket: &mut Socket,
    session: &mut Session,
    frame: &str,
    listener: &SocketListener,
) -> Result<Flow, tungstenite::Error> {
    // Unknown or binary frames are not ours to interpret.
    let Ok(packet) = Packet::decode(frame) else {
        return Ok(Flow::Continue);
    };

    match packet {
        Packet::Open(_) => send(socket, &Packet::Connect(None))?,
        Packet::Ping => send(socket, &Packet::Pong)?,
        Packet::Connect(_) => {
            session.connected = true;
            listener(SocketEvent::Connected);
        }
        Packet::Ack { id, args } => {
            if let Some(callback) = session.take_ack(id) {
                callback(args);
            }
        }
        Packet::ConnectError(data) => {
            listener(SocketEvent::Error(format!("connection refused: {data}")));
            return Ok(Flow::Stop);
        }
        Packet::Disconnect | Packet::Close => {
            listener(SocketEvent::Disconnected(
                "server closed the connection".into(),
            ));
            return Ok(Flow::Stop);
        }
        Packet::Pong | Packet::Noop | Packet::Event { .. } => {}
    }

    Ok(Flow::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_ack(calls: &Arc<AtomicUsize>) -> AckCallback {
        let calls = Arc::clone(calls);
        Box::new(move |_| {
            calls.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn ack_ids_increase() {
        let mut session = Session::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let now = Instant::now();

        assert_eq!(session.register_ack(counting_ack(&calls), now), 0);
        assert_eq!(session.register_ack(counting_ack(&calls), now), 1);

        let callback = session.take_ack(1).expect("pending ack");
        callback(vec![]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(session.take_ack(1).is_none());
        assert_eq!(session.pending.len(), 1);
    }

    #[test]
    fn unanswered_acks_expire() {
        let mut session = Session::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let start = Instant::now();

        session.register_ack(counting_ack(&calls), start);
        session.register_ack(counting_ack(&calls), start);
        let later = start + ACK_WINDOW + Duration::from_secs(1);
        let id = session.register_ack(counting_ack(&calls), later);

        assert_eq!(session.pending.len(), 1);
        assert!(session.take_ack(id).is_some());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn pending_acks_are_capped() {
        let mut session = Session::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let now = Instant::now();

        for _ in 0..MAX_PENDING_ACKS + 10 {
            session.register_ack(counting_ack(&calls), now);
        }

        assert_eq!(session.pending.len(), MAX_PENDING_ACKS);
        assert!(session.take_ack(0).is_none());
        assert!(session.take_ack((MAX_PENDING_ACKS + 9) as u64).is_some());
    }
}
