//! The dispatcher: one verified configuration, one active transport, level-named entry points.
//!
//! A dispatcher is built unconfigured and becomes configured exactly once through
//! [`Dispatcher::init`]. The hot path takes no lock: the configuration sits in a `OnceLock`,
//! the demotion flag and the counters are atomics.

mod alert;
mod builder;
mod from_config;
mod global;

pub use alert::Alerts;
pub use builder::DispatcherBuilder;
pub use global::{alerts, init, init_alerts, logger};

use crate::config::{ConfigError, EnvLookup, TransportKind, VerifiedConfig};
use crate::console::Console;
use crate::fmt::Args;
use crate::internal::Diagnostics;
use crate::level::{LevelFilter, Severity};
use crate::net::{HttpClient, SocketConnector};
use crate::transport::{ConsoleTransport, Fallback, Record, Transport};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

const SCOPE: &str = "LOGGER";

/// Counters since construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    /// Records handed to a transport, including console after a demotion.
    pub forwarded: u64,
    /// Records below the base level.
    pub filtered: u64,
}

/// State fixed by `init`.
struct Active {
    config: VerifiedConfig,
    filter: LevelFilter,
    transport: Option<Box<dyn Transport>>,
    console: ConsoleTransport,
}

pub struct Dispatcher {
    console: Arc<dyn Console>,
    diagnostics: Diagnostics,
    http: OnceLock<Arc<dyn HttpClient>>,
    connector: Arc<dyn SocketConnector>,
    env: EnvLookup,
    colors: bool,
    fallback: Fallback,
    active: OnceLock<Active>,
    forwarded: AtomicU64,
    filtered: AtomicU64,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("configured", &self.is_configured())
            .field("active_transport", &self.active_transport())
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Dispatcher {
    /// Capabilities (console, HTTP, sockets, environment) are injected here, before `init`.
    #[must_use]
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    /// Verifies `config` and activates its transport.
    ///
    /// A second call warns and leaves the first configuration in place.
    ///
    /// # Errors
    /// Missing project name, unresolvable environment, or unknown keys.
    pub fn init(&self, config: crate::config::RawConfig) -> Result<(), ConfigError> {
        if self.active.get().is_some() {
            self.diagnostics
                .warn(SCOPE, "Already configured, ignoring second init()");
            return Ok(());
        }

        let verifier = self.verifier(&config);
        let (verified, environment) = verifier.verify(config)?;
        let active = self.activate(verified);

        let summary = format!(
            "{} configured for {environment}, transport {}, base level {}",
            active.config.project.name,
            active
                .transport
                .as_ref()
                .map_or("none", |t| t.kind().as_str()),
            active.filter.base()
        );

        if self.active.set(active).is_err() {
            self.diagnostics
                .warn(SCOPE, "Already configured, ignoring second init()");
            return Ok(());
        }
        self.diagnostics.success(SCOPE, &summary);
        Ok(())
    }

    /// Sends `args` at `level`. Never fails; problems are reported on the console.
    pub fn log(&self, level: Severity, args: impl Into<Args>) {
        let Some(active) = self.active.get() else {
            self.diagnostics
                .warn(SCOPE, "Not configured, call init() first");
            return;
        };
        self.dispatch(active, &Record::log(level, args.into()));
    }

    /// Lowest severity; dropped by any base level above `log`.
    pub fn plain(&self, args: impl Into<Args>) {
        self.log(Severity::Log, args);
    }

    pub fn info(&self, args: impl Into<Args>) {
        self.log(Severity::Info, args);
    }

    pub fn success(&self, args: impl Into<Args>) {
        self.log(Severity::Success, args);
    }

    pub fn warn(&self, args: impl Into<Args>) {
        self.log(Severity::Warn, args);
    }

    pub fn error(&self, args: impl Into<Args>) {
        self.log(Severity::Error, args);
    }

    /// Alert-shaped calls (message, channel, attachments) on the same configuration.
    #[must_use]
    pub const fn alerts(&self) -> Alerts<'_> {
        Alerts::new(self)
    }

    /// Transport records currently go to: console once demoted, `None` when disabled or
    /// not configured.
    #[must_use]
    pub fn active_transport(&self) -> Option<TransportKind> {
        let active = self.active.get()?;
        let kind = active.transport.as_ref()?.kind();
        if self.fallback.is_tripped() {
            Some(TransportKind::Console)
        } else {
            Some(kind)
        }
    }

    #[must_use]
    pub fn verified(&self) -> Option<&VerifiedConfig> {
        self.active.get().map(|a| &a.config)
    }

    #[must_use]
    pub fn stats(&self) -> Stats {
        Stats {
            forwarded: self.forwarded.load(Ordering::Relaxed),
            filtered: self.filtered.load(Ordering::Relaxed),
        }
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.active.get().is_some()
    }

    pub(crate) fn send_alert(&self, record: &Record) {
        let Some(active) = self.active.get() else {
            self.diagnostics
                .warn(SCOPE, "Not configured, call init() first");
            return;
        };
        self.dispatch(active, record);
    }

    fn dispatch(&self, active: &Active, record: &Record) {
        if !active.filter.allows(record.level) {
            self.filtered.fetch_add(1, Ordering::Relaxed);
            return;
        }
        let Some(ref transport) = active.transport else {
            return;
        };

        if self.fallback.is_tripped() {
            let _ = active.console.send(record);
            self.forwarded.fetch_add(1, Ordering::Relaxed);
            return;
        }

        match transport.send(record) {
            Ok(()) => {
                self.forwarded.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                self.fallback
                    .trip(&format!("{} transport failed: {e}", transport.kind()));
            }
        }
    }
}
