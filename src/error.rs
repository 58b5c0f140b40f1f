//! Unified error types for the drive firmware.
//!
//! Follows embedded best practice: a single `Error` enum that every subsystem
//! can convert into, keeping the top-level control loop's error handling uniform.
//! All variants are `Copy` so they can be cheaply passed around without
//! allocation.
//!
//! Faults are deliberately **not** errors: a [`Fault`] is a sticky status bit
//! accumulated by the fault register and reported over telemetry.  Nothing in
//! the control core unwinds on a fault — degraded operation (power forced to
//! zero) is the worst outcome.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A console command could not be parsed or was out of range.
    Command(CommandError),
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Command(e) => write!(f, "command: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Console command errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    /// The line did not match any known command form.
    Unknown,
    /// The argument was not a well-formed integer.
    BadInteger,
    /// The argument parsed but is outside the accepted range.
    OutOfRange,
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown command"),
            Self::BadInteger => write!(f, "malformed integer"),
            Self::OutOfRange => write!(f, "argument out of range"),
        }
    }
}

impl From<CommandError> for Error {
    fn from(e: CommandError) -> Self {
        Self::Command(e)
    }
}

// ---------------------------------------------------------------------------
// Faults
// ---------------------------------------------------------------------------

/// Sticky fault flags, accumulated in the [fault register](crate::faults)
/// and drained (read-then-clear) once per telemetry period.
///
/// Bit positions preserve the error-byte layout the supervising web UI
/// already decodes from the `err:` telemetry field; bit 0 is reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Fault {
    /// No mains zero-crossing observed for a full expected half-cycle.
    ZeroCrossingLoss = 0b0000_0010,
    /// No tachometer edge before the capture deadline while drive power
    /// was commanded.
    TachoStall = 0b0000_0100,
    /// Water-level sensor produced no capture before the deadline.
    WaterTimeout = 0b0000_1000,
}

impl Fault {
    /// Return the bitmask for this fault.
    pub const fn mask(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroCrossingLoss => write!(f, "zero-crossing loss"),
            Self::TachoStall => write!(f, "tachometer stall"),
            Self::WaterTimeout => write!(f, "water sensor timeout"),
        }
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
