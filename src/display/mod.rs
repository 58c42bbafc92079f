use anyhow::{Context, Result};
use crossterm::terminal;

pub mod input;
pub mod renderer;
pub mod theme;

/// Enables raw mode for the lifetime of the value, restoring the terminal
/// on drop (including unwind paths).
pub struct RawModeGuard {
    enabled: bool,
}

impl RawModeGuard {
    /// Enable raw mode. Pass `enabled = false` to get an inert guard (used
    /// when output is not a terminal, e.g. under tests).
    pub fn acquire(enabled: bool) -> Result<Self> {
        if enabled {
            terminal::enable_raw_mode().context("failed to enable raw mode")?;
        }
        Ok(Self { enabled })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if self.enabled {
            terminal::disable_raw_mode().ok();
        }
    }
}
