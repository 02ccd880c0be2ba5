//! Command-line front end: verify a config, or push one message through it.
//!
//! Usage:
//!   relaylog check [-c FILE]                         Verify a config
//!   relaylog send <level> <message...> [-c FILE]     Log a message
//!   relaylog send <level> <message...> --alert [--channel NAME]

use clap::Parser;
use relaylog::cli::{Cli, Command, cmd_check, cmd_send, load_config};
use relaylog::internal::Diagnostics;
use relaylog::{Dispatcher, Error};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let diagnostics = Diagnostics::default().colors(!cli.no_color);

    match run(cli, &diagnostics) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            diagnostics.error("CLI", &e.to_string());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, diagnostics: &Diagnostics) -> Result<(), Error> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Check => cmd_check(config, diagnostics),
        Command::Send {
            level,
            message,
            alert,
            channel,
        } => {
            let dispatcher = Dispatcher::builder().colors(!cli.no_color).build();
            cmd_send(
                &dispatcher,
                config,
                &level,
                &message.join(" "),
                alert.then_some(channel.as_deref()),
            )
        }
    }
}
