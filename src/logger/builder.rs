//! Injects the dispatcher's capabilities. Anything left unset falls back to the real thing:
//! stdout/stderr, `reqwest`, `tungstenite`, and the process environment.

use super::Dispatcher;
use crate::config::{EnvLookup, process_env};
use crate::console::{Console, StdConsole};
use crate::internal::Diagnostics;
use crate::net::{HttpClient, SocketConnector, TungsteniteConnector};
use crate::transport::Fallback;
use std::sync::atomic::AtomicU64;
use std::sync::{Arc, OnceLock};

#[must_use]
pub struct DispatcherBuilder {
    console: Arc<dyn Console>,
    http: Option<Arc<dyn HttpClient>>,
    connector: Arc<dyn SocketConnector>,
    env: EnvLookup,
    colors: bool,
}

impl Default for DispatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DispatcherBuilder {
    pub fn new() -> Self {
        Self {
            console: Arc::new(StdConsole),
            http: None,
            connector: Arc::new(TungsteniteConnector),
            env: process_env(),
            colors: true,
        }
    }

    /// Where the console transport and relaylog's own diagnostics write.
    pub fn console(mut self, console: Arc<dyn Console>) -> Self {
        self.console = console;
        self
    }

    /// Client for the HTTP, Slack and Discord transports and for health checks.
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http = Some(client);
        self
    }

    pub fn socket_connector(mut self, connector: Arc<dyn SocketConnector>) -> Self {
        self.connector = connector;
        self
    }

    /// Resolves `environment.key`; defaults to the process environment.
    pub fn env_lookup(mut self, env: EnvLookup) -> Self {
        self.env = env;
        self
    }

    /// ANSI colors on console lines and diagnostics.
    pub const fn colors(mut self, enabled: bool) -> Self {
        self.colors = enabled;
        self
    }

    pub fn build(self) -> Dispatcher {
        let diagnostics = Diagnostics::new(Arc::clone(&self.console)).colors(self.colors);
        let http = OnceLock::new();
        if let Some(client) = self.http {
            let _ = http.set(client);
        }

        Dispatcher {
            console: self.console,
            fallback: Fallback::new(diagnostics.clone()),
            diagnostics,
            http,
            connector: self.connector,
            env: self.env,
            colors: self.colors,
            active: OnceLock::new(),
            forwarded: AtomicU64::new(0),
            filtered: AtomicU64::new(0),
        }
    }
}
