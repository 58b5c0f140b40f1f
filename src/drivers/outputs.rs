//! Main-loop digital outputs: direction relay, boost relay, heartbeat LED.
//!
//! Dumb actuators — every safety decision (drum at rest before a direction
//! switch, power cut on faults) is made upstream in the control core.  The
//! triac gate is **not** here; it belongs to the firing ISRs alone.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives real GPIO via hw_init helpers.
//! On host/test: tracks state in-memory only.

use crate::control::speed::Direction;
use crate::drivers::hw_init;
use crate::pins;

pub struct DriveOutputs {
    direction: Direction,
    boost: bool,
    led: bool,
}

impl DriveOutputs {
    pub fn new() -> Self {
        Self {
            direction: Direction::Forward,
            boost: false,
            led: true,
        }
    }

    /// Switch the direction relay.  LOW = forward, HIGH = reverse.
    pub fn set_direction(&mut self, dir: Direction) {
        self.direction = dir;
        hw_init::gpio_write(pins::DIRECTION_GPIO, dir == Direction::Reverse);
    }

    pub fn set_boost(&mut self, on: bool) {
        self.boost = on;
        hw_init::gpio_write(pins::BOOST_GPIO, on);
    }

    /// Heartbeat: flipped once per telemetry period.
    pub fn toggle_led(&mut self) {
        self.led = !self.led;
        hw_init::gpio_write(pins::LED_GPIO, self.led);
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn boost(&self) -> bool {
        self.boost
    }
}

impl Default for DriveOutputs {
    fn default() -> Self {
        Self::new()
    }
}
