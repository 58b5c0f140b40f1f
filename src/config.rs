//! System configuration parameters
//!
//! All tunable parameters for the drum drive.  Runtime state only — the
//! board has no persistent storage, so every value reinitialises from
//! `Default` at reset.  The serde derives exist for structured read-back
//! over the console and for host-side test fixtures.

use serde::{Deserialize, Serialize};

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Mains timing ---
    /// Phase ticks per AC half-cycle (100 ticks of 100 µs at 50 Hz mains).
    pub half_cycle_ticks: u8,
    /// Phase tick period in microseconds.
    pub phase_tick_us: u32,

    // --- Capture calibration ---
    /// Capture timer rate in ticks per millisecond (1.5 MHz timebase).
    pub capture_ticks_per_ms: u32,
    /// Deadline with no edges before a channel is declared dead
    /// (16-bit timer wraparound at the capture rate, ~44 ms).
    pub capture_timeout_ms: u32,
    /// RPM numerator: `rpm = rpm_calibration / tacho_interval_ticks`.
    /// Fixed by tacho coil geometry and the capture timer rate.
    pub rpm_calibration: u32,

    // --- Timing ---
    /// Speed-control cadence (milliseconds).
    pub control_loop_interval_ms: u32,
    /// Telemetry report period, in control-loop ticks.
    pub telemetry_interval_ticks: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Mains: 50 Hz → 10 ms half-cycle, 10 kHz phase tick
            half_cycle_ticks: 100,
            phase_tick_us: 100,

            // Capture: 1.5 MHz timebase, 16-bit deadline
            capture_ticks_per_ms: 1_500,
            capture_timeout_ms: 44,
            rpm_calibration: 900_000,

            // Timing
            control_loop_interval_ms: 100, // 10 Hz
            telemetry_interval_ticks: 10,  // ~1 s
        }
    }
}

impl SystemConfig {
    /// Range-check the configuration; rejects values that would break the
    /// firing state machine or divide by zero in the capture math.
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::Error;
        if self.half_cycle_ticks == 0 || self.half_cycle_ticks == u8::MAX {
            return Err(Error::Config("half_cycle_ticks must be 1..=254"));
        }
        if self.phase_tick_us == 0 {
            return Err(Error::Config("phase_tick_us must be nonzero"));
        }
        if self.capture_ticks_per_ms == 0 || self.rpm_calibration == 0 {
            return Err(Error::Config("capture calibration must be nonzero"));
        }
        if self.control_loop_interval_ms == 0 || self.telemetry_interval_ticks == 0 {
            return Err(Error::Config("control/telemetry cadence must be nonzero"));
        }
        Ok(())
    }
}
