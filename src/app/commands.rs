//! Inbound commands to the drive service.
//!
//! These represent actions requested over the serial console (or any other
//! transport) that the [`DriveService`](super::service::DriveService)
//! interprets and acts upon, independent of textual framing.

/// Commands the console adapter can send into the drive core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveCommand {
    /// Manual power override (0–100 %).  Disables automatic speed control;
    /// still subject to ramp limiting and fault gating.
    SetPower(u8),

    /// Automatic wanted speed in signed RPM (sign = direction).
    /// Re-enables automatic control; a sign flip starts the
    /// direction-reversal sequence.
    SetSpeed(i16),

    /// Auxiliary boost output, pure pass-through.
    Boost(bool),
}
