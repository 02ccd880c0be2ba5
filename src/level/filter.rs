//! Minimum-severity gate applied before any transport work.

use super::Severity;

/// `true` when a message of `message_weight` passes a minimum of `base_weight`.
#[must_use]
pub const fn should_emit(message_weight: u8, base_weight: u8) -> bool {
    message_weight >= base_weight
}

/// Typed wrapper over [`should_emit`] holding the configured base level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LevelFilter {
    base: Severity,
}

impl LevelFilter {
    #[must_use]
    pub const fn new(base: Severity) -> Self {
        Self { base }
    }

    #[must_use]
    pub const fn base(self) -> Severity {
        self.base
    }

    #[must_use]
    pub const fn allows(self, level: Severity) -> bool {
        should_emit(level.weight(), self.base.weight())
    }
}
