//! Discord webhook transport.

use super::{Record, Transport, TransportError, resolve_channel};
use crate::config::{DiscordTransportConfig, Environment, Project, TransportKind};
use crate::fmt::Color;
use crate::internal::Diagnostics;
use crate::net::{HttpClient, HttpRequest};
use serde_json::{Value, json};
use std::sync::Arc;

pub struct DiscordTransport {
    config: DiscordTransportConfig,
    project: Project,
    environment: Environment,
    client: Arc<dyn HttpClient>,
    diagnostics: Diagnostics,
}

impl std::fmt::Debug for DiscordTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordTransport")
            .field("channels", &self.config.channels.keys().collect::<Vec<_>>())
            .field("username", &self.config.username)
            .finish_non_exhaustive()
    }
}

impl DiscordTransport {
    #[must_use]
    pub fn new(
        config: DiscordTransportConfig,
        project: Project,
        environment: Environment,
        client: Arc<dyn HttpClient>,
        diagnostics: Diagnostics,
    ) -> Self {
        Self {
            config,
            project,
            environment,
            client,
            diagnostics,
        }
    }

    /// Embed color is the level color as a plain integer.
    #[must_use]
    pub fn payload(&self, record: &Record) -> Value {
        let field = |name: &str, value: &str| json!({"name": name, "value": value, "inline": true});
        let timestamp = record.timestamp.format("%Y-%m-%d %H:%M:%S").to_string();

        let mut embeds = vec![json!({
            "color": Color::for_level(record.level).to_u32(),
            "fields": [
                field("Project", &self.project.name),
                field("Version", &self.project.version),
                field("Environment", self.environment.as_str()),
                field("Timestamp", &timestamp),
            ],
        })];
        embeds.extend(record.extra.iter().cloned());

        json!({
            "username": self.config.username,
            "content": format!("**[{}]**\n{}", record.level.label(), record.message()),
            "embeds": embeds,
        })
    }
}

impl Transport for DiscordTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Discord
    }

    fn send(&self, record: &Record) -> Result<(), TransportError> {
        let url = match resolve_channel(
            "discord",
            &self.config.channels,
            self.config.default_channel.as_deref(),
            record.channel.as_deref(),
        ) {
            Ok(url) => url,
            Err(warning) => {
                self.diagnostics.warn("DISCORD", &warning);
                return Ok(());
            }
        };

        self.client
            .send(HttpRequest::post_json(url, self.payload(record)))?;
        Ok(())
    }
}
