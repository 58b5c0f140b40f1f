//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ DriveService (domain)
//! ```
//!
//! Driven adapters (sensor snapshots, output pins, event sinks) implement
//! these traits.  The [`DriveService`](super::service::DriveService) consumes
//! them via generics, so the domain core never touches hardware directly and
//! the whole control chain runs against mocks on the host.
//!
//! The triac gate is deliberately **absent** here: it is owned by the firing
//! ISRs and no main-loop code may write it.

use crate::control::speed::Direction;
use crate::sensors::capture::CaptureSnapshot;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this to obtain measurement snapshots.
///
/// Each capture call follows the publish protocol — it freezes and resets
/// the channel's running extrema, so call it once per consumer per period.
pub trait SensorPort {
    /// Tachometer snapshot (interval ticks + window extrema).
    fn tacho(&mut self) -> CaptureSnapshot;

    /// Water-level snapshot (16-edge group ticks + window extrema).
    fn water_level(&mut self) -> CaptureSnapshot;

    /// Raw 12-bit ADC sample of the temperature divider.
    fn temperature_raw(&mut self) -> u16;
}

// ───────────────────────────────────────────────────────────────
// Output port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the main-loop-owned outputs.
pub trait OutputPort {
    /// Switch the direction relay.  Callers guarantee the drum is at rest.
    fn set_direction(&mut self, dir: Direction);

    /// Auxiliary boost output (console pass-through).
    fn set_boost(&mut self, on: bool);

    /// Heartbeat LED.
    fn toggle_led(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (serial console log,
/// a recording sink in tests).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
