//! Socket.IO and hosted stream transports. Both emit one event per record over a lazily
//! opened connection and share the failure handling.

use super::{Fallback, Record, Transport, TransportError, project_json};
use crate::config::{
    Project, SocketEvents, SocketIoTransportConfig, StreamTransportConfig, TransportKind,
};
use crate::internal::Diagnostics;
use crate::net::{AckCallback, ConnectOptions, SocketConnector, SocketEvent, SocketHandle};
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};

const STREAM_EVENT: &str = "addLog";

/// Extra payload fields per flavor.
#[derive(Debug, Clone)]
enum Flavor {
    SocketIo,
    Stream { log_name: String },
}

pub struct SocketTransport {
    kind: TransportKind,
    flavor: Flavor,
    options: ConnectOptions,
    events: SocketEvents,
    project: Project,
    connector: Arc<dyn SocketConnector>,
    fallback: Fallback,
    diagnostics: Diagnostics,
    handle: OnceLock<Box<dyn SocketHandle>>,
}

impl std::fmt::Debug for SocketTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SocketTransport")
            .field("kind", &self.kind)
            .field("url", &self.options.url)
            .field("events", &self.events)
            .field("connected", &self.handle.get().is_some())
            .finish_non_exhaustive()
    }
}

impl SocketTransport {
    /// Transport for a user-run Socket.IO server.
    #[must_use]
    pub fn socket_io(
        config: SocketIoTransportConfig,
        project: Project,
        connector: Arc<dyn SocketConnector>,
        fallback: Fallback,
        diagnostics: Diagnostics,
    ) -> Self {
        Self {
            kind: TransportKind::SocketIo,
            flavor: Flavor::SocketIo,
            options: ConnectOptions {
                url: config.base_url,
                headers: config.headers,
            },
            events: config.events,
            project,
            connector,
            fallback,
            diagnostics,
            handle: OnceLock::new(),
        }
    }

    /// Transport for the hosted log stream; authenticates with `projectId`/`key` headers.
    #[must_use]
    pub fn stream(
        config: StreamTransportConfig,
        project: Project,
        connector: Arc<dyn SocketConnector>,
        fallback: Fallback,
        diagnostics: Diagnostics,
    ) -> Self {
        let headers = BTreeMap::from([
            ("projectId".to_string(), config.project_id),
            ("key".to_string(), config.secret_key),
        ]);
        Self {
            kind: TransportKind::Stream,
            flavor: Flavor::Stream {
                log_name: config.log_name,
            },
            options: ConnectOptions {
                url: config.url,
                headers,
            },
            events: SocketEvents {
                connection: None,
                disconnect: None,
                log: STREAM_EVENT.to_string(),
            },
            project,
            connector,
            fallback,
            diagnostics,
            handle: OnceLock::new(),
        }
    }

    /// Event payload for one record.
    #[must_use]
    pub fn payload(&self, record: &Record) -> Value {
        let mut payload = Map::new();
        payload.insert("level".into(), json!(record.level.label()));
        payload.insert("data".into(), Value::Array(record.values()));
        if let Flavor::Stream { ref log_name } = self.flavor {
            payload.insert("logName".into(), json!(log_name));
        }
        payload.insert("timeStamp".into(), json!(record.timestamp.to_rfc3339()));
        Value::Object(payload)
    }

    fn handle(&self) -> Result<&dyn SocketHandle, TransportError> {
        if let Some(handle) = self.handle.get() {
            return Ok(&**handle);
        }

        let handle = self.connect()?;
        // On a race the first connection wins; ours closes when dropped here.
        let _ = self.handle.set(handle);
        self.handle
            .get()
            .map(|handle| &**handle)
            .ok_or_else(|| TransportError::Format("socket handle unavailable".into()))
    }

    fn connect(&self) -> Result<Box<dyn SocketHandle>, TransportError> {
        let fallback = self.fallback.clone();
        let diagnostics = self.diagnostics.clone();
        let url = self.options.url.clone();
        let name = self.kind;

        let listener = Arc::new(move |event: SocketEvent| match event {
            SocketEvent::Connected => {
                diagnostics.success("SOCKET", &format!("{name} connected to {url}"));
            }
            SocketEvent::Disconnected(reason) => {
                fallback.trip(&format!("{name} disconnected: {reason}"));
            }
            SocketEvent::Error(e) => {
                fallback.trip(&format!("{name} connection error: {e}"));
            }
        });

        let handle = self.connector.connect(self.options.clone(), listener)?;

        // Held back by the handle until the namespace connect is acknowledged.
        if let Some(ref event) = self.events.connection {
            handle.emit(
                event,
                json!({
                    "project": project_json(&self.project),
                    "message": "Connected to socket.io server",
                }),
                None,
            );
        }
        Ok(handle)
    }

    fn ack_callback(&self) -> AckCallback {
        let fallback = self.fallback.clone();
        let name = self.kind;
        Box::new(move |args: Vec<Value>| {
            let error = args
                .first()
                .and_then(|response| response.get("error"))
                .filter(|e| !e.is_null());
            if let Some(error) = error {
                let reason = error
                    .as_str()
                    .map_or_else(|| error.to_string(), ToString::to_string);
                fallback.trip(&format!("{name} rejected log: {reason}"));
            }
        })
    }
}

impl Transport for SocketTransport {
    fn kind(&self) -> TransportKind {
        self.kind
    }

    fn send(&self, record: &Record) -> Result<(), TransportError> {
        let handle = self.handle()?;
        handle.emit(
            &self.events.log,
            self.payload(record),
            Some(self.ack_callback()),
        );
        Ok(())
    }
}

impl Drop for SocketTransport {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.get() {
            if let Some(ref event) = self.events.disconnect {
                handle.emit(
                    event,
                    json!({
                        "project": project_json(&self.project),
                        "message": "Disconnected from socket.io server",
                    }),
                    None,
                );
            }
            handle.close();
        }
    }
}
