//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the main-loop-side drivers and exposes them through [`SensorPort`]
//! and [`OutputPort`].  Sensor reads go through the capture channels'
//! snapshot protocol; outputs go through [`DriveOutputs`].  On non-espidf
//! targets the underlying drivers use cfg-gated simulation stubs.

use crate::app::ports::{OutputPort, SensorPort};
use crate::control::speed::Direction;
use crate::drivers::outputs::DriveOutputs;
use crate::sensors::capture::CaptureSnapshot;
use crate::sensors::temperature::TemperatureSensor;
use crate::sensors::{tacho, water_level};

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter {
    outputs: DriveOutputs,
    temperature: TemperatureSensor,
}

impl HardwareAdapter {
    pub fn new(outputs: DriveOutputs, temperature: TemperatureSensor) -> Self {
        Self {
            outputs,
            temperature,
        }
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl SensorPort for HardwareAdapter {
    fn tacho(&mut self) -> CaptureSnapshot {
        tacho::snapshot()
    }

    fn water_level(&mut self) -> CaptureSnapshot {
        water_level::snapshot()
    }

    fn temperature_raw(&mut self) -> u16 {
        self.temperature.read()
    }
}

// ── OutputPort implementation ─────────────────────────────────

impl OutputPort for HardwareAdapter {
    fn set_direction(&mut self, dir: Direction) {
        self.outputs.set_direction(dir);
    }

    fn set_boost(&mut self, on: bool) {
        self.outputs.set_boost(on);
    }

    fn toggle_led(&mut self) {
        self.outputs.toggle_led();
    }
}
