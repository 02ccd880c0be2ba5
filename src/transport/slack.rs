//! Slack incoming-webhook transport.

use super::{Record, Transport, TransportError, resolve_channel};
use crate::config::{Environment, Project, SlackTransportConfig, TransportKind};
use crate::fmt::Color;
use crate::internal::Diagnostics;
use crate::net::{HttpClient, HttpRequest};
use serde_json::{Map, Value, json};
use std::sync::Arc;

pub struct SlackTransport {
    config: SlackTransportConfig,
    project: Project,
    environment: Environment,
    client: Arc<dyn HttpClient>,
    diagnostics: Diagnostics,
}

impl std::fmt::Debug for SlackTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackTransport")
            .field("channels", &self.config.channels.keys().collect::<Vec<_>>())
            .field("default_channel", &self.config.default_channel)
            .finish_non_exhaustive()
    }
}

impl SlackTransport {
    #[must_use]
    pub fn new(
        config: SlackTransportConfig,
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

    #[must_use]
    pub fn payload(&self, record: &Record) -> Value {
        let field = |title: &str, value: &str| json!({"title": title, "value": value, "short": true});
        let timestamp = record.timestamp.format("%Y-%m-%d %H:%M:%S").to_string();

        let mut attachments = vec![json!({
            "color": Color::for_level(record.level).to_string(),
            "fields": [
                field("Project", &self.project.name),
                field("Version", &self.project.version),
                field("Environment", self.environment.as_str()),
                field("Timestamp", &timestamp),
            ],
        })];
        attachments.extend(record.extra.iter().cloned());

        let mut payload = Map::new();
        if let Some(ref username) = self.config.username {
            payload.insert("username".into(), json!(username));
        }
        if let Some(ref icon) = self.config.icon {
            let key = if icon.starts_with(':') {
                "icon_emoji"
            } else {
                "icon_url"
            };
            payload.insert(key.into(), json!(icon));
        }
        payload.insert(
            "text".into(),
            json!(format!("*[{}]*\n{}", record.level.label(), record.message())),
        );
        payload.insert("attachments".into(), Value::Array(attachments));
        Value::Object(payload)
    }
}

impl Transport for SlackTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Slack
    }

    fn send(&self, record: &Record) -> Result<(), TransportError> {
        let url = match resolve_channel(
            "slack",
            &self.config.channels,
            self.config.default_channel.as_deref(),
            record.channel.as_deref(),
        ) {
            Ok(url) => url,
            Err(warning) => {
                self.diagnostics.warn("SLACK", &warning);
                return Ok(());
            }
        };

        self.client
            .send(HttpRequest::post_json(url, self.payload(record)))?;
        Ok(())
    }
}
