//! GPIO / peripheral pin assignments for the drive board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Mains-side outputs
// ---------------------------------------------------------------------------

/// Triac gate drive (via opto-triac).  The gate is driven **active-low**:
/// LOW = conducting.  Written exclusively by the firing controller ISRs.
pub const TRIAC_GATE_GPIO: i32 = 4;

/// Direction relay select: LOW = forward, HIGH = reverse.
/// Only ever switched with the drum at rest.
pub const DIRECTION_GPIO: i32 = 5;

/// Auxiliary boost output (heater relay), pass-through from the console.
pub const BOOST_GPIO: i32 = 6;

// ---------------------------------------------------------------------------
// Mains-side inputs
// ---------------------------------------------------------------------------

/// Zero-crossing detector (opto-coupled), falling edge twice per AC cycle.
pub const ZERO_CROSS_GPIO: i32 = 7;

// ---------------------------------------------------------------------------
// Sensors — Digital / Pulse
// ---------------------------------------------------------------------------

/// Tachometer coil comparator output, one pulse train proportional to
/// drum speed, interrupt-driven, timestamped per rising edge.
pub const TACHO_GPIO: i32 = 8;

/// Water-level pressure sensor frequency output (22–24 kHz nominal).
/// The capture path divides by 16 edges per reading for noise immunity.
pub const WATER_LEVEL_GPIO: i32 = 9;

// ---------------------------------------------------------------------------
// Sensors — Analog (ADC1)
// ---------------------------------------------------------------------------

/// NTC thermistor voltage divider.  ADC1 channel 0 (GPIO 1 on ESP32-S3).
pub const TEMP_ADC_GPIO: i32 = 1;

// ---------------------------------------------------------------------------
// Status LED
// ---------------------------------------------------------------------------

/// Heartbeat LED, toggled once per telemetry period.
pub const LED_GPIO: i32 = 10;

// ---------------------------------------------------------------------------
// UART console
// ---------------------------------------------------------------------------

pub const UART_TX_GPIO: i32 = 17;
pub const UART_RX_GPIO: i32 = 18;
