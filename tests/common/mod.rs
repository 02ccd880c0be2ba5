//! Test doubles shared by the integration tests.

#![allow(dead_code)]

use relaylog::Dispatcher;
use relaylog::console::CaptureConsole;
use relaylog::net::{
    AckCallback, ConnectOptions, HttpClient, HttpError, HttpRequest, SocketConnector, SocketError,
    SocketEvent, SocketHandle, SocketListener,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

/// Records every request instead of sending it.
#[derive(Clone, Default)]
pub struct RecordingHttp {
    requests: Arc<Mutex<Vec<HttpRequest>>>,
    probes: Arc<Mutex<Vec<HttpRequest>>>,
    probe_status: Option<u16>,
}

impl RecordingHttp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Health check probes answer with `status`; without one they fail.
    pub fn probe_status(mut self, status: u16) -> Self {
        self.probe_status = Some(status);
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn probes(&self) -> Vec<HttpRequest> {
        self.probes.lock().unwrap().clone()
    }
}

impl HttpClient for RecordingHttp {
    fn send(&self, request: HttpRequest) -> Result<(), HttpError> {
        self.requests.lock().unwrap().push(request);
        Ok(())
    }

    fn probe(&self, request: HttpRequest) -> Result<u16, HttpError> {
        self.probes.lock().unwrap().push(request);
        self.probe_status.ok_or_else(|| {
            HttpError::Spawn(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "connection refused",
            ))
        })
    }
}

/// Socket connector that never touches the network.
///
/// Every emit is recorded; ack callbacks run immediately with the configured reply.
#[derive(Clone, Default)]
pub struct MockConnector {
    pub emits: Arc<Mutex<Vec<(String, Value)>>>,
    pub options: Arc<Mutex<Vec<ConnectOptions>>>,
    pub connects: Arc<AtomicUsize>,
    pub closed: Arc<AtomicBool>,
    ack_reply: Arc<Mutex<Vec<Value>>>,
    on_connect: Option<SocketEvent>,
    refuse: bool,
}

impl MockConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arguments every ack callback receives.
    pub fn ack_reply(self, reply: Vec<Value>) -> Self {
        *self.ack_reply.lock().unwrap() = reply;
        self
    }

    /// Fired on the listener as soon as `connect` is called.
    pub fn on_connect(mut self, event: SocketEvent) -> Self {
        self.on_connect = Some(event);
        self
    }

    /// `connect` itself fails.
    pub fn refuse(mut self) -> Self {
        self.refuse = true;
        self
    }

    pub fn emitted(&self) -> Vec<(String, Value)> {
        self.emits.lock().unwrap().clone()
    }

    pub fn emitted_events(&self) -> Vec<String> {
        self.emitted().into_iter().map(|(event, _)| event).collect()
    }
}

impl SocketConnector for MockConnector {
    fn connect(
        &self,
        options: ConnectOptions,
        listener: SocketListener,
    ) -> Result<Box<dyn SocketHandle>, SocketError> {
        if self.refuse {
            return Err(SocketError::InvalidUrl(options.url));
        }
        self.connects.fetch_add(1, Ordering::SeqCst);
        self.options.lock().unwrap().push(options);
        if let Some(ref event) = self.on_connect {
            listener(event.clone());
        }
        Ok(Box::new(MockHandle {
            emits: Arc::clone(&self.emits),
            closed: Arc::clone(&self.closed),
            ack_reply: self.ack_reply.lock().unwrap().clone(),
        }))
    }
}

struct MockHandle {
    emits: Arc<Mutex<Vec<(String, Value)>>>,
    closed: Arc<AtomicBool>,
    ack_reply: Vec<Value>,
}

impl SocketHandle for MockHandle {
    fn emit(&self, event: &str, payload: Value, ack: Option<AckCallback>) {
        self.emits
            .lock()
            .unwrap()
            .push((event.to_string(), payload));
        if let Some(callback) = ack {
            callback(self.ack_reply.clone());
        }
    }

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

/// Dispatcher wired to in-memory doubles.
pub fn dispatcher(console: &CaptureConsole, http: &RecordingHttp, sockets: &MockConnector) -> Dispatcher {
    Dispatcher::builder()
        .console(Arc::new(console.clone()))
        .http_client(Arc::new(http.clone()))
        .socket_connector(Arc::new(sockets.clone()))
        .env_lookup(env(&[]))
        .colors(false)
        .build()
}

/// Environment lookup backed by a fixed map.
pub fn env(vars: &[(&str, &str)]) -> relaylog::config::EnvLookup {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    Arc::new(move |key| vars.get(key).cloned())
}

/// Polls `condition` for up to five seconds; background delivery needs a moment.
pub fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(20));
    }
    condition()
}
