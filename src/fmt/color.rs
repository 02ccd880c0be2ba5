//! Severity colors shared by the console transport, diagnostics and chat alerts.
//!
//! Chat platforms take a hex string (Slack) or an integer (Discord) while terminals take an
//! ANSI escape, so one RGB triple per level feeds all three renderings.

use crate::level::Severity;
use std::fmt;

/// A dedicated type prevents mixing up raw u8 triples and documents color intent at the type level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#RRGGBB`. Falls back to white on malformed input so a typo never breaks rendering.
    #[must_use]
    pub fn from_hex(hex: &str) -> Self {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Self::white();
        }

        let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(255);
        let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(255);
        let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(255);

        Self { r, g, b }
    }

    /// 24-bit foreground escape.
    #[must_use]
    pub fn fg_ansi(self) -> String {
        format!("\x1b[38;2;{};{};{}m", self.r, self.g, self.b)
    }

    /// Discord embeds take the color as a packed `0xRRGGBB` integer.
    #[must_use]
    pub const fn to_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    pub const RESET: &'static str = "\x1b[0m";

    #[must_use]
    pub const fn white() -> Self {
        Self::new(236, 240, 241)
    }

    #[must_use]
    pub const fn blue() -> Self {
        Self::new(52, 152, 219)
    }

    #[must_use]
    pub const fn green() -> Self {
        Self::new(46, 204, 113)
    }

    #[must_use]
    pub const fn yellow() -> Self {
        Self::new(241, 196, 15)
    }

    #[must_use]
    pub const fn red() -> Self {
        Self::new(231, 76, 60)
    }

    /// The palette every transport renders levels with.
    #[must_use]
    pub const fn for_level(level: Severity) -> Self {
        match level {
            Severity::Log => Self::white(),
            Severity::Info => Self::blue(),
            Severity::Success => Self::green(),
            Severity::Warn => Self::yellow(),
            Severity::Error => Self::red(),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Wraps `text` in the color's escape and a reset.
#[must_use]
pub fn colorize(text: &str, color: Color) -> String {
    let fg = color.fg_ansi();
    let reset = Color::RESET;
    format!("{fg}{text}{reset}")
}

/// Shorthand for coloring with a level's palette entry.
#[must_use]
pub fn colorize_level(text: &str, level: Severity) -> String {
    colorize(text, Color::for_level(level))
}
