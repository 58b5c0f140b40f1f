//! NTC thermistor temperature channel.
//!
//! Wired in a voltage divider and sampled by the ESP32-S3 ADC.  The drive
//! core never acts on temperature — the raw 12-bit sample is simply carried
//! in telemetry for the supervising side to interpret.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads ADC1 via the oneshot API (initialised by hw_init).
//! On host/test: reads from a static AtomicU16 for injection.

use core::sync::atomic::AtomicU16;
#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::Ordering;

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;

static SIM_TEMP_ADC: AtomicU16 = AtomicU16::new(0);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_temp_adc(raw: u16) {
    SIM_TEMP_ADC.store(raw, Ordering::Relaxed);
}

pub struct TemperatureSensor {
    last_raw: u16,
    _adc_gpio: i32,
}

impl TemperatureSensor {
    pub fn new(adc_gpio: i32) -> Self {
        Self {
            last_raw: 0,
            _adc_gpio: adc_gpio,
        }
    }

    /// Sample the channel and return the raw 12-bit ADC value.
    pub fn read(&mut self) -> u16 {
        self.last_raw = self.read_adc();
        self.last_raw
    }

    /// Most recent sample without re-reading.
    pub fn last_raw(&self) -> u16 {
        self.last_raw
    }

    #[cfg(target_os = "espidf")]
    fn read_adc(&self) -> u16 {
        hw_init::adc1_read(hw_init::ADC1_CH_TEMP)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_adc(&self) -> u16 {
        SIM_TEMP_ADC.load(Ordering::Relaxed)
    }
}
