//! Outbound application events.
//!
//! The [`DriveService`](super::service::DriveService) emits these through
//! the [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them — format a console line, log, or record
//! in tests.

use serde::Serialize;

use crate::control::speed::Direction;

/// Structured events emitted by the drive core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Periodic telemetry snapshot.
    Telemetry(TelemetryData),

    /// The direction relay was committed after a reversal sequence.
    DirectionCommitted(Direction),

    /// A command was accepted.
    CommandAccepted,

    /// The service has started.
    Started,
}

/// A point-in-time telemetry snapshot suitable for logging or transmission.
///
/// `fault_flags` is the drained (read-then-clear) fault byte for the period
/// that just ended.
#[derive(Debug, Clone, Serialize)]
pub struct TelemetryData {
    /// Commanded power level (0–100).
    pub power: u8,
    /// Last tachometer interval in capture ticks (0 = stopped/no data).
    pub tacho_ticks: u16,
    /// Derived drum speed.
    pub rpm: u16,
    /// Raw temperature ADC sample.
    pub temperature_raw: u16,
    /// Signed wanted-speed setpoint.
    pub wanted_rpm: i16,
    /// Last water-level capture group interval.
    pub water_ticks: u16,
    /// Drained fault byte.
    pub fault_flags: u8,
}
