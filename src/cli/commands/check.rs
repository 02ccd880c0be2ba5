//! `relaylog check`: run the verifier and show the outcome without sending anything.

use crate::Error;
use crate::config::{ConfigVerifier, RawConfig, VerifiedConfig};
use crate::internal::Diagnostics;

/// # Errors
/// The config fails verification.
pub fn cmd_check(config: RawConfig, diagnostics: &Diagnostics) -> Result<(), Error> {
    let (verified, _) = ConfigVerifier::new(diagnostics.clone()).verify(config)?;
    for line in summary(&verified) {
        println!("{line}");
    }
    Ok(())
}

fn summary(config: &VerifiedConfig) -> Vec<String> {
    let mut sections = Vec::new();
    for (name, present) in [
        ("file", config.file.is_some()),
        ("http", config.http.is_some()),
        ("socket_io", config.socket_io.is_some()),
        ("stream", config.stream.is_some()),
        ("slack", config.slack.is_some()),
        ("discord", config.discord.is_some()),
    ] {
        if present {
            sections.push(name);
        }
    }

    vec![
        format!(
            "project      {} {}",
            config.project.name, config.project.version
        ),
        format!("environment  {}", config.environment),
        format!(
            "transport    {}",
            config.transport.map_or("none", |t| t.as_str())
        ),
        format!("base level   {}", config.base_level),
        format!(
            "sections     {}",
            if sections.is_empty() {
                "-".to_string()
            } else {
                sections.join(", ")
            }
        ),
    ]
}
