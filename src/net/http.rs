//! HTTP capability used by the HTTP, Slack and Discord transports and the health check.

use super::HTTP_THREAD;
use crate::internal::Diagnostics;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::thread;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
/// Requests waiting for the delivery thread.
const QUEUE_CAPACITY: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            _ => Err(s.to_string()),
        }
    }
}

/// One outgoing request. Bodies are always JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: Option<Value>,
}

impl HttpRequest {
    #[must_use]
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: BTreeMap::new(),
            body: None,
        }
    }

    /// `POST` with a JSON body and `Content-Type: application/json`.
    #[must_use]
    pub fn post_json(url: impl Into<String>, body: Value) -> Self {
        let mut request = Self::new(HttpMethod::Post, url);
        request
            .headers
            .insert("Content-Type".to_string(), "application/json".to_string());
        request.body = Some(body);
        request
    }

    /// Adds `headers`; existing names are overwritten.
    #[must_use]
    pub fn headers(mut self, headers: &BTreeMap<String, String>) -> Self {
        for (name, value) in headers {
            self.headers.insert(name.clone(), value.clone());
        }
        self
    }
}

#[derive(Debug)]
pub enum HttpError {
    /// Client construction or transport-level failure.
    Request(reqwest::Error),
    /// The delivery thread could not be started.
    Spawn(std::io::Error),
    /// The delivery thread is gone; nothing more can be sent.
    Closed,
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request(e) => write!(f, "request failed: {e}"),
            Self::Spawn(e) => write!(f, "failed to spawn request thread: {e}"),
            Self::Closed => f.write_str("request thread stopped"),
        }
    }
}

impl std::error::Error for HttpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Request(e) => Some(e),
            Self::Spawn(e) => Some(e),
            Self::Closed => None,
        }
    }
}

impl From<reqwest::Error> for HttpError {
    fn from(e: reqwest::Error) -> Self {
        Self::Request(e)
    }
}

/// The HTTP client as seen by transports.
pub trait HttpClient: Send + Sync {
    /// Best effort: returns as soon as the request is handed off. There is no delivery
    /// guarantee and the caller never learns the outcome.
    ///
    /// # Errors
    /// Only if the request could not be handed off at all.
    fn send(&self, request: HttpRequest) -> Result<(), HttpError>;

    /// Blocks until a response arrives and returns its status code.
    ///
    /// # Errors
    /// Connection, TLS or timeout failures.
    fn probe(&self, request: HttpRequest) -> Result<u16, HttpError>;
}

/// `reqwest` blocking client.
///
/// `send` hands requests to one delivery thread over a bounded queue; when the queue is full
/// the request is dropped with a warning. `probe` runs on the caller's thread.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
    queue: SyncSender<HttpRequest>,
    diagnostics: Diagnostics,
}

impl ReqwestClient {
    /// # Errors
    /// The TLS backend or resolver could not be initialized, or the delivery thread could not
    /// be started.
    pub fn new(diagnostics: Diagnostics) -> Result<Self, HttpError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        let (queue, requests) = mpsc::sync_channel(QUEUE_CAPACITY);
        let worker_client = client.clone();
        let worker_diagnostics = diagnostics.clone();
        thread::Builder::new()
            .name(HTTP_THREAD.into())
            .spawn(move || deliver(&worker_client, &requests, &worker_diagnostics))
            .map_err(HttpError::Spawn)?;

        Ok(Self {
            client,
            queue,
            diagnostics,
        })
    }

    fn execute(client: &reqwest::blocking::Client, request: &HttpRequest) -> Result<u16, HttpError> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut builder = client.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }

        let response = builder.send()?;
        Ok(response.status().as_u16())
    }
}

/// Runs until every [`ReqwestClient`] clone is dropped.
fn deliver(
    client: &reqwest::blocking::Client,
    requests: &Receiver<HttpRequest>,
    diagnostics: &Diagnostics,
) {
    for request in requests {
        match ReqwestClient::execute(client, &request) {
            Ok(status) if (200..300).contains(&status) => {}
            Ok(status) => diagnostics.warn(
                "HTTP",
                &format!("{} {} returned status {status}", request.method, request.url),
            ),
            Err(e) => diagnostics.warn(
                "HTTP",
                &format!("{} {} failed: {e}", request.method, request.url),
            ),
        }
    }
}

impl HttpClient for ReqwestClient {
    fn send(&self, request: HttpRequest) -> Result<(), HttpError> {
        match self.queue.try_send(request) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(request)) => {
                self.diagnostics.warn(
                    "HTTP",
                    &format!(
                        "request queue full, dropped {} {}",
                        request.method, request.url
                    ),
                );
                Ok(())
            }
            Err(TrySendError::Disconnected(_)) => Err(HttpError::Closed),
        }
    }

    fn probe(&self, request: HttpRequest) -> Result<u16, HttpError> {
        Self::execute(&self.client, &request)
    }
}
