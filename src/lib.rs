#![forbid(unsafe_code)]

//! `relaylog` - Configurable logging and alerting facade.
//!
//! A configuration is verified once, one output transport is selected from it, and every
//! leveled message is routed to that transport:
//! - console, daily files (`json`, `log`, `txt`), HTTP, Socket.IO, a hosted log stream,
//!   Slack and Discord webhooks
//! - per-environment transport rules resolved from an environment variable
//! - invalid configuration degrades to the console instead of failing
//! - remote failures demote the dispatcher to the console for all later calls
//! - optional bridge for the `log` crate macros
//!
//! # Example
//!
//! ```
//! use relaylog::{Dispatcher, RawConfig, args};
//! use relaylog::console::CaptureConsole;
//! use std::sync::Arc;
//!
//! let console = CaptureConsole::new();
//! let logger = Dispatcher::builder()
//!     .console(Arc::new(console.clone()))
//!     .colors(false)
//!     .build();
//!
//! logger
//!     .init(RawConfig::new("api").version("2.1.0").transport("console").base_level("info"))
//!     .unwrap();
//!
//! logger.info("server started");
//! logger.warn(args!["slow request", 1200]);
//! logger.plain("filtered out");
//!
//! assert!(console.contains("[api:2.1.0 |"));
//! assert_eq!(logger.stats().filtered, 1);
//! ```
//!
//! # Features
//!
//! - `cli` (default): Enables the `relaylog` command-line tool

pub mod config;
pub mod console;
pub mod error;
pub mod fmt;
pub mod internal;
pub mod level;
pub mod logger;
pub mod net;
pub mod transport;

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;

// Re-exports for convenience
pub use config::{ConfigError, ConfigVerifier, Environment, RawConfig, TransportKind, VerifiedConfig};
pub use error::Error;
pub use fmt::{Args, Color};
pub use level::{LevelFilter, Severity, should_emit};
pub use logger::{Alerts, Dispatcher, DispatcherBuilder, Stats, alerts, init, init_alerts, logger};
pub use transport::{BodyBuilder, BodyContext, Record, Transport, TransportError};
