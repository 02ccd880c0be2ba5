use super::Dispatcher;
use crate::level::Severity;
use crate::transport::Record;
use serde_json::Value;

/// Alert calls on a dispatcher: a message, an optional chat channel and optional
/// attachments (Slack) or embeds (Discord).
///
/// Transports without channels ignore `channel`; `extra` is appended to the message there.
#[derive(Debug, Clone, Copy)]
pub struct Alerts<'a> {
    dispatcher: &'a Dispatcher,
}

impl<'a> Alerts<'a> {
    pub(super) const fn new(dispatcher: &'a Dispatcher) -> Self {
        Self { dispatcher }
    }

    pub fn alert(
        &self,
        level: Severity,
        message: &str,
        channel: Option<&str>,
        extra: Option<Vec<Value>>,
    ) {
        self.dispatcher
            .send_alert(&Record::alert(level, message, channel, extra));
    }

    pub fn info(&self, message: &str, channel: Option<&str>, extra: Option<Vec<Value>>) {
        self.alert(Severity::Info, message, channel, extra);
    }

    pub fn success(&self, message: &str, channel: Option<&str>, extra: Option<Vec<Value>>) {
        self.alert(Severity::Success, message, channel, extra);
    }

    pub fn warn(&self, message: &str, channel: Option<&str>, extra: Option<Vec<Value>>) {
        self.alert(Severity::Warn, message, channel, extra);
    }

    pub fn error(&self, message: &str, channel: Option<&str>, extra: Option<Vec<Value>>) {
        self.alert(Severity::Error, message, channel, extra);
    }

    /// The dispatcher behind this view.
    #[must_use]
    pub const fn dispatcher(&self) -> &'a Dispatcher {
        self.dispatcher
    }
}
