//! Process-wide logger and alert dispatchers, and the `log` crate bridge.

use super::{Alerts, Dispatcher};
use crate::config::{ConfigError, RawConfig};
use crate::fmt::Args;
use crate::level::Severity;
use crate::net::{HTTP_THREAD, SOCKET_THREAD};
use std::sync::OnceLock;
use std::thread;

static LOGGER: OnceLock<Dispatcher> = OnceLock::new();
static ALERTS: OnceLock<Dispatcher> = OnceLock::new();
static BRIDGE: Bridge = Bridge;

/// Crates that log while relaylog delivers. Bridging them would feed every delivery back
/// into the transport.
const NETWORK_TARGETS: &[&str] = &[
    "reqwest",
    "hyper",
    "hyper_util",
    "h2",
    "tungstenite",
    "native_tls",
    "rustls",
    "want",
    "mio",
    "tokio",
];

/// The global logger. Unconfigured until [`init`].
pub fn logger() -> &'static Dispatcher {
    LOGGER.get_or_init(Dispatcher::default)
}

/// The global alert dispatcher. Unconfigured until [`init_alerts`].
pub fn alerts() -> Alerts<'static> {
    ALERTS.get_or_init(Dispatcher::default).alerts()
}

/// Configures the global logger. With `extend_console` set, `log::info!` and friends are
/// routed through it as well.
///
/// # Errors
/// See [`Dispatcher::init`].
pub fn init(config: RawConfig) -> Result<(), ConfigError> {
    let dispatcher = logger();
    let first = !dispatcher.is_configured();
    dispatcher.init(config)?;

    if first && dispatcher.verified().is_some_and(|c| c.extend_console) {
        install_bridge(dispatcher);
    }
    Ok(())
}

/// Configures the global alert dispatcher.
///
/// # Errors
/// See [`Dispatcher::init`].
pub fn init_alerts(config: RawConfig) -> Result<(), ConfigError> {
    ALERTS.get_or_init(Dispatcher::default).init(config)
}

fn install_bridge(dispatcher: &Dispatcher) {
    if log::set_logger(&BRIDGE).is_ok() {
        let max = dispatcher
            .verified()
            .map_or(log::LevelFilter::Trace, |c| c.base_level.into());
        log::set_max_level(max);
        dispatcher
            .diagnostics
            .info("BRIDGE", "log macros now route through relaylog");
    } else {
        dispatcher
            .diagnostics
            .warn("BRIDGE", "Another log implementation is already installed");
    }
}

/// `true` for records produced by relaylog's own delivery: anything logged on a delivery
/// thread or by one of the network crates.
fn is_delivery_record(metadata: &log::Metadata<'_>) -> bool {
    let target = metadata.target();
    let network = NETWORK_TARGETS.iter().any(|name| {
        target
            .strip_prefix(*name)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
    });
    network
        || thread::current()
            .name()
            .is_some_and(|name| name == HTTP_THREAD || name == SOCKET_THREAD)
}

/// `log::Log` implementation forwarding to the global logger.
struct Bridge;

impl log::Log for Bridge {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
            && logger().is_configured()
            && !is_delivery_record(metadata)
    }

    fn log(&self, record: &log::Record<'_>) {
        if self.enabled(record.metadata()) {
            logger().log(
                Severity::from(record.level()),
                Args::from(record.args().to_string()),
            );
        }
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(target: &str) -> log::Metadata<'_> {
        log::Metadata::builder()
            .level(log::Level::Info)
            .target(target)
            .build()
    }

    #[test]
    fn network_targets_are_delivery_records() {
        assert!(is_delivery_record(&metadata("reqwest")));
        assert!(is_delivery_record(&metadata("reqwest::connect")));
        assert!(is_delivery_record(&metadata("hyper_util::client::legacy")));
        assert!(is_delivery_record(&metadata("tungstenite::protocol")));
    }

    #[test]
    fn host_targets_are_bridged() {
        assert!(!is_delivery_record(&metadata("billing")));
        assert!(!is_delivery_record(&metadata("reqwestish::worker")));
    }

    #[test]
    fn delivery_threads_are_never_bridged() {
        let on_http = thread::Builder::new()
            .name(HTTP_THREAD.into())
            .spawn(|| is_delivery_record(&metadata("billing")))
            .unwrap()
            .join()
            .unwrap();
        assert!(on_http);
    }
}
