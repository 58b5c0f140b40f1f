//! Ramp-limited power stage.
//!
//! Owns the commanded power level (0–100 %), the single source of truth for
//! how hard the motor is driven.  Every change goes through [`PowerStage::set`],
//! which enforces the ramp limits, honours the zero-crossing-loss fault, and
//! stages the resulting firing window as *pending* for the triac controller
//! to arm at the next crossing.
//!
//! Main-loop only; the interrupt side sees nothing of this module except the
//! staged window.

use crate::control::triac;
use crate::control::window::{power_to_window, FiringWindow};
use crate::error::Fault;
use crate::faults::FaultRegister;

/// Largest first step out of standstill.  Covers the speed controller's
/// static-friction jump to 25 with margin, nothing more.
const FIRST_STEP_LIMIT: u8 = 30;
/// Largest single increase once the motor is already powered.
const STEP_LIMIT: u8 = 10;

/// The commanded power level and its staged firing window.
pub struct PowerStage {
    level: u8,
    window: FiringWindow,
}

impl PowerStage {
    pub const fn new() -> Self {
        Self {
            level: 0,
            window: FiringWindow::OFF,
        }
    }

    /// Commanded power level (0–100).
    pub fn level(&self) -> u8 {
        self.level
    }

    /// The window staged for the current level.
    pub fn window(&self) -> FiringWindow {
        self.window
    }

    /// Request a new power level.  Returns the realised level.
    ///
    /// Increases are rate-limited regardless of what the caller asked for:
    /// at most [`FIRST_STEP_LIMIT`] out of standstill, at most
    /// [`STEP_LIMIT`] otherwise.  Decreases always pass unclamped — safety
    /// favours fast power reduction.
    ///
    /// While mains sync is lost no power may be commanded at all: the level
    /// is forced to 0 and the request rejected.
    pub fn set(&mut self, requested: u8, faults: &FaultRegister) -> u8 {
        let mut val = requested.min(100);
        if val > self.level {
            let limit = if self.level == 0 {
                FIRST_STEP_LIMIT
            } else {
                self.level + STEP_LIMIT
            };
            val = val.min(limit);
        }

        if faults.is_set(Fault::ZeroCrossingLoss) {
            return self.apply(0);
        }

        self.apply(val)
    }

    /// Force the level down to `ceiling` if it currently exceeds it.
    ///
    /// Used by the speed controller's stalled-rotor guard; never raises.
    pub fn clamp_to(&mut self, ceiling: u8) -> u8 {
        if self.level > ceiling {
            self.apply(ceiling);
        }
        self.level
    }

    fn apply(&mut self, level: u8) -> u8 {
        self.level = level;
        self.window = power_to_window(level);
        triac::stage_window(self.window);
        level
    }
}

impl Default for PowerStage {
    fn default() -> Self {
        Self::new()
    }
}
