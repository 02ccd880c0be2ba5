//! `relaylog send`: one message from a shell script, through whatever the config selects.

use super::parse_level;
use crate::Error;
use crate::config::{RawConfig, TransportKind};
use crate::logger::Dispatcher;
use std::thread;
use std::time::Duration;

/// Remote transports deliver on background threads; give them a moment before exiting.
const DRAIN_DELAY: Duration = Duration::from_millis(500);

/// `alert` is `None` for a log record, or `Some(channel)` for an alert.
///
/// # Errors
/// `level` is not a known level, or the config fails verification.
pub fn cmd_send(
    dispatcher: &Dispatcher,
    config: RawConfig,
    level: &str,
    message: &str,
    alert: Option<Option<&str>>,
) -> Result<(), Error> {
    let level = parse_level(level)?;
    dispatcher.init(config)?;

    match alert {
        Some(channel) => dispatcher.alerts().alert(level, message, channel, None),
        None => dispatcher.log(level, message),
    }

    if dispatcher
        .active_transport()
        .is_some_and(|t| !matches!(t, TransportKind::Console | TransportKind::File))
    {
        thread::sleep(DRAIN_DELAY);
    }
    Ok(())
}
