//! Firing window type and the power-demand mapper.
//!
//! A [`FiringWindow`] is the pair of phase-tick indices between which the
//! triac gate is held on within one AC half-cycle.  The mapper converts a
//! 0–100 % power demand into a window; smaller turn-on tick = earlier
//! firing = more conduction angle = more delivered power.

use serde::{Deserialize, Serialize};

/// Sentinel tick meaning "never this half-cycle".
pub const NEVER: u8 = 0xFF;

/// Power below which the output stays fully off, in `100 - power` terms.
/// Sub-minimum firing pulses produce lamp-flicker-style misfires.
const DEAD_BAND_OFF: u8 = 95;
/// `100 - power` under which the triac fires at the crossing and stays on.
const DEAD_BAND_FULL: u8 = 3;
/// Half-width of the firing pulse in phase ticks.
const PULSE_HALF_WIDTH: u8 = 3;

/// One half-cycle's gate schedule: turn on at `turn_on`, off at `turn_off`.
///
/// Invariant: `turn_on <= turn_off` whenever both are real ticks.  [`NEVER`]
/// on either edge keeps the gate off for that transition; `(NEVER, NEVER)`
/// keeps the triac off for the whole half-cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiringWindow {
    pub turn_on: u8,
    pub turn_off: u8,
}

impl FiringWindow {
    /// The always-off window.
    pub const OFF: Self = Self {
        turn_on: NEVER,
        turn_off: NEVER,
    };

    /// True if the gate will conduct at some point this half-cycle.
    pub fn is_active(self) -> bool {
        self.turn_on != NEVER
    }

    /// Pack into one `u16` so the pending window fits a single atomic cell.
    pub const fn pack(self) -> u16 {
        ((self.turn_on as u16) << 8) | self.turn_off as u16
    }

    /// Inverse of [`pack`](Self::pack).
    pub const fn unpack(raw: u16) -> Self {
        Self {
            turn_on: (raw >> 8) as u8,
            turn_off: (raw & 0xFF) as u8,
        }
    }
}

/// Map a 0–100 % power demand to a firing window.
///
/// The window is centred at `100 - power`: full power fires at tick 0
/// (whole half-cycle conducting), low power fires late.  A symmetric
/// dead-band clips both ends — below ~5 % the output is fully off, above
/// ~97 % it is fully on.  In between, the gate pulse is a fixed 6 ticks
/// wide, the minimum that triggers the triac reliably.
pub fn power_to_window(power: u8) -> FiringWindow {
    let power = power.min(100);
    let center = 100 - power;

    if center >= DEAD_BAND_OFF {
        FiringWindow::OFF
    } else if center < DEAD_BAND_FULL {
        FiringWindow {
            turn_on: 0,
            turn_off: NEVER,
        }
    } else {
        FiringWindow {
            turn_on: center - PULSE_HALF_WIDTH,
            turn_off: center + PULSE_HALF_WIDTH,
        }
    }
}
