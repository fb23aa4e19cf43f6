//! Diagnostic verbosity
//!
//! Messages carry a level from 1 (always shown) to 10 (event-level detail).
//! A message is emitted through `tracing` only when its level does not
//! exceed the current verbosity. [`Verbosity::tracing_level`] maps the same
//! scale onto `tracing` levels, so subscribers can filter the library's
//! `debug!`/`trace!` output by verbosity.

use tracing::{info, Level};

/// Highest verbosity level; particle replays always run at this level
pub const MAX_VERBOSITY: u8 = 10;

/// Default verbosity of a production run
pub const DEFAULT_VERBOSITY: u8 = 7;

/// Verbosity gate for operator-facing messages
///
/// # Example
/// ```
/// use particle_restart_core::core::verbosity::{Verbosity, MAX_VERBOSITY};
///
/// let mut v = Verbosity::default();
/// assert!(!v.enabled(9));
/// v.raise_to_max();
/// assert_eq!(v.level(), MAX_VERBOSITY);
/// assert!(v.enabled(9));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verbosity(u8);

impl Verbosity {
    /// Create a verbosity gate, clamped to `MAX_VERBOSITY`
    pub fn new(level: u8) -> Self {
        Self(level.min(MAX_VERBOSITY))
    }

    /// Verbosity of a particle replay
    pub fn max() -> Self {
        Self(MAX_VERBOSITY)
    }

    pub fn level(&self) -> u8 {
        self.0
    }

    pub fn raise_to_max(&mut self) {
        self.0 = MAX_VERBOSITY;
    }

    pub fn enabled(&self, level: u8) -> bool {
        level <= self.0
    }

    /// Most detailed `tracing` level shown at this verbosity
    ///
    /// Level 10 enables event-level (`trace`) output, 7-9 per-history
    /// (`debug`) output.
    pub fn tracing_level(&self) -> Level {
        match self.0 {
            0 => Level::ERROR,
            1..=4 => Level::WARN,
            5..=6 => Level::INFO,
            7..=9 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }

    /// Emit `message` if `level` is enabled
    pub fn message(&self, level: u8, message: impl AsRef<str>) {
        if self.enabled(level) {
            info!(level, "{}", message.as_ref());
        }
    }
}

impl Default for Verbosity {
    fn default() -> Self {
        Self(DEFAULT_VERBOSITY)
    }
}
