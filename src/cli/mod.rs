//! CLI module for relaylog.
//!
//! This module provides the command-line interface using Clap.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// relaylog - Verify configs and send messages through their transport.
#[derive(Parser)]
#[command(
    name = "relaylog",
    version,
    about = "Verify relaylog configs and send messages through them"
)]
pub struct Cli {
    /// Config file (TOML, or JSON with a .json extension). Defaults to the XDG config path.
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Disable ANSI colors.
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Verify the config and print what it resolves to.
    Check,
    /// Send one message through the configured transport.
    Send {
        /// Message level: log, info, success, warn or error
        level: String,
        /// Message text
        #[arg(required = true)]
        message: Vec<String>,
        /// Send as an alert instead of a log record
        #[arg(long)]
        alert: bool,
        /// Chat channel for Slack/Discord alerts
        #[arg(long, requires = "alert")]
        channel: Option<String>,
    },
}

pub use commands::{cmd_check, cmd_send, load_config, parse_level};
