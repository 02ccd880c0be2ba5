//! HTTP transport: posts one JSON body per record, fire-and-forget.

use super::{Record, RecordKind, Transport, TransportError, project_json};
use crate::config::{Environment, HttpTransportConfig, Project, TransportKind};
use crate::level::Severity;
use crate::net::{HttpClient, HttpRequest};
use chrono::{DateTime, Local};
use serde_json::{Value, json};
use std::fmt;
use std::sync::Arc;

/// What a custom body builder gets to work with.
#[derive(Debug, Clone)]
pub struct BodyContext<'a> {
    pub level: Severity,
    pub kind: RecordKind,
    pub project: &'a Project,
    pub environment: Environment,
    /// Arguments rendered as one line.
    pub message: &'a str,
    /// Arguments and extras as JSON.
    pub values: &'a [Value],
    pub timestamp: DateTime<Local>,
}

/// Replaces the default request body, e.g. to match an existing ingestion API.
#[derive(Clone)]
pub struct BodyBuilder(Arc<dyn Fn(&BodyContext<'_>) -> Value + Send + Sync>);

impl BodyBuilder {
    pub fn new(f: impl Fn(&BodyContext<'_>) -> Value + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    #[must_use]
    pub fn build(&self, context: &BodyContext<'_>) -> Value {
        (self.0)(context)
    }
}

impl fmt::Debug for BodyBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BodyBuilder(..)")
    }
}

pub struct HttpTransport {
    config: HttpTransportConfig,
    project: Project,
    environment: Environment,
    client: Arc<dyn HttpClient>,
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.config.base_url)
            .field("environment", &self.environment)
            .finish_non_exhaustive()
    }
}

impl HttpTransport {
    #[must_use]
    pub fn new(
        config: HttpTransportConfig,
        project: Project,
        environment: Environment,
        client: Arc<dyn HttpClient>,
    ) -> Self {
        Self {
            config,
            project,
            environment,
            client,
        }
    }

    /// Log calls get `{log, project}`, alert calls the flat alert shape.
    #[must_use]
    pub fn body(&self, record: &Record) -> Value {
        let message = record.text();

        if let Some(ref builder) = self.config.body_builder {
            let values = record.values();
            return builder.build(&BodyContext {
                level: record.level,
                kind: record.kind,
                project: &self.project,
                environment: self.environment,
                message: &message,
                values: &values,
                timestamp: record.timestamp,
            });
        }

        match record.kind {
            RecordKind::Log => json!({
                "log": {
                    "level": record.level.as_str(),
                    "message": message,
                    "timestamp": record.timestamp.to_rfc3339(),
                },
                "project": project_json(&self.project),
            }),
            RecordKind::Alert => json!({
                "project": project_json(&self.project),
                "message": message,
                "level": record.level.as_str(),
                "env": self.environment.as_str(),
                "timestamp": record.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            }),
        }
    }
}

impl Transport for HttpTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Http
    }

    fn send(&self, record: &Record) -> Result<(), TransportError> {
        let request =
            HttpRequest::post_json(&self.config.base_url, self.body(record)).headers(&self.config.headers);
        self.client.send(request)?;
        Ok(())
    }
}
