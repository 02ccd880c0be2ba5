//! Turning a verified configuration into a live transport.

use super::{Active, Dispatcher, SCOPE};
use crate::config::{ConfigVerifier, RawConfig, TransportKind, VerifiedConfig};
use crate::level::LevelFilter;
use crate::net::{HttpClient, ReqwestClient};
use crate::transport::{
    ConsoleTransport, DiscordTransport, FileTransport, HttpTransport, SlackTransport,
    SocketTransport, Transport,
};
use std::sync::Arc;

impl Dispatcher {
    /// Only hands out an HTTP client when a health check will actually need one.
    pub(super) fn verifier(&self, raw: &RawConfig) -> ConfigVerifier {
        let verifier =
            ConfigVerifier::new(self.diagnostics.clone()).env_lookup(Arc::clone(&self.env));
        let wants_probe = raw
            .http
            .as_ref()
            .is_some_and(|http| http.health_check.is_some());

        match wants_probe.then(|| self.http_client()).flatten() {
            Some(client) => verifier.http_client(client),
            None => verifier,
        }
    }

    pub(super) fn activate(&self, config: VerifiedConfig) -> Active {
        let console = ConsoleTransport::new(Arc::clone(&self.console), config.project.clone())
            .colors(self.colors);
        let transport = config
            .transport
            .map(|kind| self.build_transport(kind, &config, &console));

        Active {
            filter: LevelFilter::new(config.base_level),
            transport,
            console,
            config,
        }
    }

    /// The verifier guarantees the sub-config for `kind` exists; if it still doesn't, or a
    /// client can't be created, the console takes over.
    fn build_transport(
        &self,
        kind: TransportKind,
        config: &VerifiedConfig,
        console: &ConsoleTransport,
    ) -> Box<dyn Transport> {
        let project = config.project.clone();
        let environment = config.environment;
        let diagnostics = self.diagnostics.clone();

        let transport: Option<Box<dyn Transport>> = match kind {
            TransportKind::Console => None,
            TransportKind::File => config
                .file
                .clone()
                .map(|file| Box::new(FileTransport::new(file, project)) as Box<dyn Transport>),
            TransportKind::Http => config.http.clone().and_then(|http| {
                let client = self.http_client()?;
                Some(Box::new(HttpTransport::new(http, project, environment, client))
                    as Box<dyn Transport>)
            }),
            TransportKind::SocketIo => config.socket_io.clone().map(|socket| {
                Box::new(SocketTransport::socket_io(
                    socket,
                    project,
                    Arc::clone(&self.connector),
                    self.fallback.clone(),
                    diagnostics,
                )) as Box<dyn Transport>
            }),
            TransportKind::Stream => config.stream.clone().map(|stream| {
                Box::new(SocketTransport::stream(
                    stream,
                    project,
                    Arc::clone(&self.connector),
                    self.fallback.clone(),
                    diagnostics,
                )) as Box<dyn Transport>
            }),
            TransportKind::Slack => config.slack.clone().and_then(|slack| {
                let client = self.http_client()?;
                Some(Box::new(SlackTransport::new(
                    slack,
                    project,
                    environment,
                    client,
                    diagnostics,
                )) as Box<dyn Transport>)
            }),
            TransportKind::Discord => config.discord.clone().and_then(|discord| {
                let client = self.http_client()?;
                Some(Box::new(DiscordTransport::new(
                    discord,
                    project,
                    environment,
                    client,
                    diagnostics,
                )) as Box<dyn Transport>)
            }),
        };

        transport.unwrap_or_else(|| {
            if kind != TransportKind::Console {
                self.diagnostics
                    .warn(SCOPE, &format!("{kind} transport unavailable, using console"));
            }
            Box::new(console.clone())
        })
    }

    /// The injected client, else a `reqwest` client created on first use.
    fn http_client(&self) -> Option<Arc<dyn HttpClient>> {
        if let Some(client) = self.http.get() {
            return Some(Arc::clone(client));
        }

        match ReqwestClient::new(self.diagnostics.clone()) {
            Ok(client) => {
                let _ = self.http.set(Arc::new(client));
                self.http.get().map(Arc::clone)
            }
            Err(e) => {
                self.diagnostics
                    .error(SCOPE, &format!("Failed to create HTTP client: {e}"));
                None
            }
        }
    }
}
